//! Derived quantities computed from a record's raw fields.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::record::VehicleRecord;
use crate::units;

/// A quantity computed from one or more record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derivation {
    /// MTOW in kilograms.
    MtowKg,
    /// MTOW over wing area, N/m².
    WingLoading,
    /// Wingspan squared over wing area.
    AspectRatio,
    /// Cruise true airspeed in km/h.
    CruiseSpeedKmh,
    /// Cruise equivalent airspeed in m/s.
    EquivalentAirspeed,
}

impl Derivation {
    /// Every derivation.
    pub const ALL: &'static [Self] = &[
        Self::MtowKg,
        Self::WingLoading,
        Self::AspectRatio,
        Self::CruiseSpeedKmh,
        Self::EquivalentAirspeed,
    ];

    /// Identifier accepted on the command line and in output labels.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MtowKg => "mtow_kg",
            Self::WingLoading => "wing_loading",
            Self::AspectRatio => "aspect_ratio",
            Self::CruiseSpeedKmh => "cruise_speed_kmh",
            Self::EquivalentAirspeed => "equivalent_airspeed",
        }
    }

    /// Compute the quantity, or `None` if any input is absent or invalid.
    #[must_use]
    pub fn compute(self, record: &VehicleRecord) -> Option<f64> {
        match self {
            Self::MtowKg => record.mtow_kg(),
            Self::WingLoading => units::wing_loading(record.mtow_n, record.wing_area_m2),
            Self::AspectRatio => units::aspect_ratio(record.wingspan_m, record.wing_area_m2),
            Self::CruiseSpeedKmh => units::to_kmh(units::positive(record.cruise_speed_ms)),
            Self::EquivalentAirspeed => {
                units::equivalent_airspeed(record.cruise_speed_ms, record.cruise_altitude_m)
            }
        }
    }
}

impl FromStr for Derivation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| Error::unknown_field(s))
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every derived quantity of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// MTOW in kilograms.
    pub mtow_kg: Option<f64>,
    /// Wing loading in N/m².
    pub wing_loading: Option<f64>,
    /// Aspect ratio.
    pub aspect_ratio: Option<f64>,
    /// Cruise speed in km/h.
    pub cruise_speed_kmh: Option<f64>,
    /// Cruise equivalent airspeed in m/s.
    pub equivalent_airspeed: Option<f64>,
}

impl DerivedMetrics {
    /// Compute all derived quantities of `record`.
    #[must_use]
    pub fn of(record: &VehicleRecord) -> Self {
        Self {
            mtow_kg: Derivation::MtowKg.compute(record),
            wing_loading: Derivation::WingLoading.compute(record),
            aspect_ratio: Derivation::AspectRatio.compute(record),
            cruise_speed_kmh: Derivation::CruiseSpeedKmh.compute(record),
            equivalent_airspeed: Derivation::EquivalentAirspeed.compute(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airliner() -> VehicleRecord {
        let mut record = VehicleRecord::named("Airliner");
        record.mtow_n = Some(785_000.0);
        record.wing_area_m2 = Some(125.0);
        record.wingspan_m = Some(35.0);
        record.cruise_speed_ms = Some(230.0);
        record.cruise_altitude_m = Some(11_000.0);
        record
    }

    #[test]
    fn test_derived_metrics() {
        let metrics = DerivedMetrics::of(&airliner());
        assert_eq!(metrics.wing_loading, Some(785_000.0 / 125.0));
        assert_eq!(metrics.aspect_ratio, Some(35.0 * 35.0 / 125.0));
        assert!((metrics.cruise_speed_kmh.unwrap() - 828.0).abs() < 1e-9);
        assert!(metrics.equivalent_airspeed.unwrap() < 230.0);
        assert!((metrics.mtow_kg.unwrap() - 785_000.0 / 9.81).abs() < 1e-6);
    }

    #[test]
    fn test_derived_metrics_of_empty_record() {
        let metrics = DerivedMetrics::of(&VehicleRecord::named("Empty"));
        assert_eq!(metrics, DerivedMetrics::default());
    }

    #[test]
    fn test_derivation_parse() {
        assert_eq!(
            "wing_loading".parse::<Derivation>().unwrap(),
            Derivation::WingLoading
        );
        assert!("wingloading".parse::<Derivation>().is_err());
        for d in Derivation::ALL {
            assert_eq!(d.to_string().parse::<Derivation>().unwrap(), *d);
        }
    }
}
