//! Unit conversions and derived aerodynamic quantities.
//!
//! Every function here is total: absent inputs, non-finite inputs and
//! physically meaningless inputs (zero or negative areas, speeds, weights)
//! produce `None` rather than `NaN`, infinity or a panic.

/// Standard gravitational acceleration in m/s², used for every N <-> kg conversion.
pub const G: f64 = 9.81;

/// Factor from m/s to km/h.
pub const MS_TO_KMH: f64 = 3.6;

/// Atmospheric scale height in metres for the exponential density model.
pub const SCALE_HEIGHT_M: f64 = 7400.0;

/// Keep `value` only when it is a finite, strictly positive magnitude.
#[inline]
#[must_use]
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[inline]
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Convert a weight in newtons to a mass in kilograms.
#[must_use]
pub fn to_kg(weight_n: Option<f64>) -> Option<f64> {
    finite(weight_n).map(|w| w / G)
}

/// Convert a speed in m/s to km/h.
#[must_use]
pub fn to_kmh(speed_ms: Option<f64>) -> Option<f64> {
    finite(speed_ms).map(|v| v * MS_TO_KMH)
}

/// Wing loading in N/m²: weight over wing area.
#[must_use]
pub fn wing_loading(mtow_n: Option<f64>, wing_area_m2: Option<f64>) -> Option<f64> {
    let weight = positive(mtow_n)?;
    let area = positive(wing_area_m2)?;
    Some(weight / area)
}

/// Aspect ratio: span squared over wing area.
#[must_use]
pub fn aspect_ratio(wingspan_m: Option<f64>, wing_area_m2: Option<f64>) -> Option<f64> {
    let span = positive(wingspan_m)?;
    let area = positive(wing_area_m2)?;
    Some(span * span / area)
}

/// Air density at `altitude_m` relative to sea level, `exp(-h / H)`.
#[must_use]
pub fn density_ratio(altitude_m: f64) -> f64 {
    (-altitude_m / SCALE_HEIGHT_M).exp()
}

/// Equivalent airspeed from true airspeed and altitude.
///
/// Without an altitude the aircraft is assumed to be at sea level, where
/// equivalent and true airspeed coincide.
#[must_use]
pub fn equivalent_airspeed(true_airspeed_ms: Option<f64>, altitude_m: Option<f64>) -> Option<f64> {
    let tas = positive(true_airspeed_ms)?;
    match finite(altitude_m) {
        Some(altitude) => Some(tas * density_ratio(altitude).sqrt()),
        None => Some(tas),
    }
}
