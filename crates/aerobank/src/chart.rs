//! Chart kinds and their aerodynamic scaling laws.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::metrics::Derivation;
use crate::record::{NumericField, VehicleRecord};
use crate::series::{build_series, Axis, GroupBy, Series};
use crate::units::G;

/// A theoretical relationship `y = k * x^exponent` over a fixed domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingLaw {
    /// Fixed exponent of the law.
    pub exponent: f64,
    /// Coefficient used when the caller supplies none.
    pub default_coefficient: f64,
    /// Lower bound of the sampled x domain.
    pub x_min: f64,
    /// Upper bound of the sampled x domain.
    pub x_max: f64,
}

/// Wing loading grows with the cube root of weight, sampled from 10 kg to
/// 1,000,000 kg expressed in newtons.
pub const WING_LOADING_MTOW_LAW: ScalingLaw = ScalingLaw {
    exponent: 1.0 / 3.0,
    default_coefficient: 25.0,
    x_min: 10.0 * G,
    x_max: 1_000_000.0 * G,
};

/// Wing loading grows with the square of airspeed, sampled from 1 to 1000 m/s.
pub const WING_LOADING_SPEED_LAW: ScalingLaw = ScalingLaw {
    exponent: 2.0,
    default_coefficient: 0.38,
    x_min: 1.0,
    x_max: 1000.0,
};

/// A chart the databank can build a series for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Wing loading against MTOW in newtons.
    WingLoadingMtow,
    /// Cruise true airspeed against MTOW.
    SpeedMtow,
    /// Cruise equivalent airspeed against MTOW.
    SpeedMtowEquivalent,
    /// Wing loading against cruise true airspeed.
    WingLoadingSpeed,
    /// Wing loading against cruise equivalent airspeed.
    WingLoadingSpeedEquivalent,
    /// Any two axes.
    Scatter {
        /// Horizontal axis.
        x: Axis,
        /// Vertical axis.
        y: Axis,
    },
    /// Any axis against year of first flight.
    Timeline {
        /// Vertical axis.
        y: Axis,
    },
}

impl ChartKind {
    /// The named flight-envelope diagrams.
    pub const DIAGRAMS: &'static [Self] = &[
        Self::WingLoadingMtow,
        Self::SpeedMtow,
        Self::SpeedMtowEquivalent,
        Self::WingLoadingSpeed,
        Self::WingLoadingSpeedEquivalent,
    ];

    /// Identifier of a named diagram, `None` for scatter and timeline charts.
    #[must_use]
    pub fn diagram_name(self) -> Option<&'static str> {
        match self {
            Self::WingLoadingMtow => Some("wing_loading_mtow"),
            Self::SpeedMtow => Some("speed_mtow"),
            Self::SpeedMtowEquivalent => Some("speed_mtow_ve"),
            Self::WingLoadingSpeed => Some("wing_loading_speed"),
            Self::WingLoadingSpeedEquivalent => Some("wing_loading_speed_ve"),
            Self::Scatter { .. } | Self::Timeline { .. } => None,
        }
    }

    /// The (x, y) axes plotted by this chart.
    #[must_use]
    pub fn axes(self) -> (Axis, Axis) {
        let mtow_n = Axis::Field(NumericField::MtowN);
        let tas = Axis::Field(NumericField::CruiseSpeed);
        let ve = Axis::Derived(Derivation::EquivalentAirspeed);
        let wing_loading = Axis::Derived(Derivation::WingLoading);

        match self {
            Self::WingLoadingMtow => (mtow_n, wing_loading),
            Self::SpeedMtow => (mtow_n, tas),
            Self::SpeedMtowEquivalent => (mtow_n, ve),
            Self::WingLoadingSpeed => (tas, wing_loading),
            Self::WingLoadingSpeedEquivalent => (ve, wing_loading),
            Self::Scatter { x, y } => (x, y),
            Self::Timeline { y } => (Axis::Field(NumericField::FirstFlightYear), y),
        }
    }

    /// Build this chart's series over `records`.
    #[must_use]
    pub fn series<'a>(
        self,
        records: impl IntoIterator<Item = &'a VehicleRecord>,
        group_by: GroupBy,
    ) -> Series {
        let (x, y) = self.axes();
        build_series(records, &x, &y, group_by)
    }

    /// Whether any trendline, fitted or theoretical, may be drawn.
    ///
    /// Speed against weight has no known power-law scaling, whichever chart
    /// plots it.
    #[must_use]
    pub fn allows_trendline(self) -> bool {
        let (x, y) = self.axes();
        !(is_weight_axis(x) && is_speed_axis(y))
    }

    /// The theoretical scaling law overlaid on this chart, if any.
    #[must_use]
    pub fn scaling_law(self) -> Option<ScalingLaw> {
        match self {
            Self::WingLoadingMtow => Some(WING_LOADING_MTOW_LAW),
            Self::WingLoadingSpeed | Self::WingLoadingSpeedEquivalent => {
                Some(WING_LOADING_SPEED_LAW)
            }
            _ => None,
        }
    }
}

fn is_weight_axis(axis: Axis) -> bool {
    matches!(
        axis,
        Axis::Field(NumericField::Mtow | NumericField::MtowN) | Axis::Derived(Derivation::MtowKg)
    )
}

fn is_speed_axis(axis: Axis) -> bool {
    matches!(
        axis,
        Axis::Field(
            NumericField::CruiseSpeed
                | NumericField::MaxSpeed
                | NumericField::TakeoffSpeed
                | NumericField::LandingSpeed
        ) | Axis::Derived(Derivation::CruiseSpeedKmh | Derivation::EquivalentAirspeed)
    )
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::DIAGRAMS
            .iter()
            .copied()
            .find(|c| c.diagram_name() == Some(s))
            .ok_or_else(|| Error::invalid_argument(format!("unknown chart '{s}'")))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.diagram_name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, Self::Timeline { y }) => write!(f, "timeline({y})"),
            (None, _) => {
                let (x, y) = self.axes();
                write!(f, "scatter({x}, {y})")
            }
        }
    }
}
