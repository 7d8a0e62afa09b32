//! Plottable series.
//!
//! A series maps every record with complete data for an (x, y) pair of axes to
//! a point, grouped by a categorical key. Axes are either raw numeric fields or
//! derived quantities; both go through the same [`Resolve`] seam so the builder
//! serves plain scatter plots and flight-envelope diagrams alike.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::metrics::Derivation;
use crate::record::{Kind, NumericField, RecordId, VehicleRecord};

/// Group label for records with no value for the grouping key.
pub const UNKNOWN_GROUP: &str = "unknown";

/// Something that yields one number per record.
pub trait Resolve {
    /// The value for `record`, or `None` if it cannot be determined.
    fn resolve(&self, record: &VehicleRecord) -> Option<f64>;

    /// Human-readable axis label.
    fn label(&self) -> String;

    /// Whether values must be strictly positive to be plotted.
    fn is_magnitude(&self) -> bool {
        true
    }

    /// Whether values are calendar years, which orders points along x.
    fn is_year(&self) -> bool {
        false
    }
}

/// A chart axis: a raw numeric field or a derived quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// A numeric field read directly from the record.
    Field(NumericField),
    /// A quantity computed from several fields.
    Derived(Derivation),
}

impl Resolve for Axis {
    fn resolve(&self, record: &VehicleRecord) -> Option<f64> {
        match self {
            Self::Field(field) => field.value(record),
            Self::Derived(derivation) => derivation.compute(record),
        }
    }

    fn label(&self) -> String {
        self.to_string()
    }

    fn is_magnitude(&self) -> bool {
        match self {
            Self::Field(field) => field.is_magnitude(),
            Self::Derived(_) => true,
        }
    }

    fn is_year(&self) -> bool {
        matches!(self, Self::Field(NumericField::FirstFlightYear))
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<NumericField>()
            .map(Self::Field)
            .or_else(|_| s.parse::<Derivation>().map(Self::Derived))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => field.fmt(f),
            Self::Derived(derivation) => derivation.fmt(f),
        }
    }
}

/// An axis backed by an arbitrary function; always treated as a magnitude.
pub struct Custom<F> {
    label: String,
    f: F,
}

impl<F> Custom<F>
where
    F: Fn(&VehicleRecord) -> Option<f64>,
{
    /// Wrap `f` as an axis called `label`.
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for Custom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("label", &self.label).finish()
    }
}

impl<F> Resolve for Custom<F>
where
    F: Fn(&VehicleRecord) -> Option<f64>,
{
    fn resolve(&self, record: &VehicleRecord) -> Option<f64> {
        (self.f)(record)
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// Categorical key used to split a series into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupBy {
    /// Type/function bucket.
    #[default]
    Type,
    /// Era bucket.
    Era,
    /// Engine family bucket.
    Engine,
    /// Size bucket.
    Size,
    /// Source dataset.
    Kind,
}

impl GroupBy {
    /// Every grouping key.
    pub const ALL: &'static [Self] = &[Self::Type, Self::Era, Self::Engine, Self::Size, Self::Kind];

    /// Identifier of the grouping key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Era => "era",
            Self::Engine => "engine",
            Self::Size => "size",
            Self::Kind => "kind",
        }
    }

    /// Group label of `record`, [`UNKNOWN_GROUP`] when the bucket is unset.
    #[must_use]
    pub fn label(self, record: &VehicleRecord) -> String {
        let label = match self {
            Self::Type => record.category_type.map(|c| c.as_str()),
            Self::Era => record.category_era.map(|c| c.as_str()),
            Self::Engine => record.category_engine.map(|c| c.as_str()),
            Self::Size => record.category_size.map(|c| c.as_str()),
            Self::Kind => Some(record.kind.as_str()),
        };
        label.unwrap_or(UNKNOWN_GROUP).to_string()
    }
}

impl FromStr for GroupBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.name() == s)
            .ok_or_else(|| Error::invalid_argument(format!("unknown grouping '{s}'")))
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record metadata carried along with each point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMeta {
    /// Namespaced record key.
    pub key: String,
    /// Raw record id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Record name.
    pub name: String,
    /// Source dataset.
    pub kind: Kind,
    /// MTOW in newtons.
    #[serde(rename = "mtow_N", skip_serializing_if = "Option::is_none")]
    pub mtow_n: Option<f64>,
    /// Wing area in m².
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wing_area_m2: Option<f64>,
    /// Cruise true airspeed in m/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cruise_speed_ms: Option<f64>,
    /// Cruise altitude in m.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cruise_altitude_m: Option<f64>,
    /// Year of first flight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_flight_year: Option<i32>,
}

impl From<&VehicleRecord> for PointMeta {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            key: record.key(),
            id: record.id.clone(),
            name: record.name.clone(),
            kind: record.kind,
            mtow_n: record.mtow_n,
            wing_area_m2: record.wing_area_m2,
            cruise_speed_ms: record.cruise_speed_ms,
            cruise_altitude_m: record.cruise_altitude_m,
            first_flight_year: record.first_flight_year,
        }
    }
}

/// One plotted point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Originating record.
    pub meta: PointMeta,
}

/// Points grouped by a categorical key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    /// Label of the x axis.
    pub x_label: String,
    /// Label of the y axis.
    pub y_label: String,
    /// Grouping key used.
    pub group_by: String,
    /// Points per group label.
    pub groups: BTreeMap<String, Vec<SeriesPoint>>,
}

impl Series {
    /// Total number of points across groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Check if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Points of one group.
    #[must_use]
    pub fn group(&self, label: &str) -> Option<&[SeriesPoint]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// All points, group by group.
    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.groups.values().flatten()
    }

    /// `(x, y)` pairs of every point.
    #[must_use]
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points().map(|p| (p.x, p.y)).collect()
    }
}

fn accept(value: Option<f64>, magnitude: bool) -> Option<f64> {
    value.filter(|v| v.is_finite() && (!magnitude || *v > 0.0))
}

/// Build a series of `y` against `x` over `records`, grouped by `group_by`.
///
/// A record contributes a point only when both axes resolve to finite values,
/// strictly positive for magnitude axes. When `x` is a year axis, each group
/// is sorted by ascending x (stable, so ties keep collection order).
pub fn build_series<'a, X, Y>(
    records: impl IntoIterator<Item = &'a VehicleRecord>,
    x: &X,
    y: &Y,
    group_by: GroupBy,
) -> Series
where
    X: Resolve + ?Sized,
    Y: Resolve + ?Sized,
{
    let mut groups: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();
    let mut excluded = 0usize;

    for record in records {
        let (Some(px), Some(py)) = (
            accept(x.resolve(record), x.is_magnitude()),
            accept(y.resolve(record), y.is_magnitude()),
        ) else {
            trace!(key = %record.key(), "Record lacks data for series");
            excluded += 1;
            continue;
        };

        groups
            .entry(group_by.label(record))
            .or_default()
            .push(SeriesPoint {
                x: px,
                y: py,
                meta: PointMeta::from(record),
            });
    }

    if x.is_year() {
        for points in groups.values_mut() {
            points.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
    }

    let series = Series {
        x_label: x.label(),
        y_label: y.label(),
        group_by: group_by.to_string(),
        groups,
    };
    debug!(
        x = %series.x_label,
        y = %series.y_label,
        points = series.len(),
        excluded,
        "Built series"
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Era, VehicleType};

    fn record(name: &str, category: Option<VehicleType>) -> VehicleRecord {
        let mut r = VehicleRecord::named(name);
        r.id = Some(RecordId::Text(name.to_lowercase()));
        r.category_type = category;
        r
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!(
            "mtow_N".parse::<Axis>().unwrap(),
            Axis::Field(NumericField::MtowN)
        );
        assert_eq!(
            "wing_loading".parse::<Axis>().unwrap(),
            Axis::Derived(Derivation::WingLoading)
        );
        assert!(matches!("bogus".parse::<Axis>(), Err(Error::UnknownField(_))));
    }

    #[test]
    fn test_build_series_filters_incomplete_and_non_positive() {
        let mut a = record("A", Some(VehicleType::Commercial));
        a.mtow_n = Some(1000.0);
        a.wing_area_m2 = Some(10.0);
        let mut b = record("B", Some(VehicleType::Commercial));
        b.mtow_n = Some(1000.0);
        let mut c = record("C", Some(VehicleType::Military));
        c.mtow_n = Some(0.0);
        c.wing_area_m2 = Some(10.0);
        let mut d = record("D", Some(VehicleType::Military));
        d.mtow_n = Some(-5.0);
        d.wing_area_m2 = Some(10.0);

        let records = [a, b, c, d];
        let series = build_series(
            &records,
            &Axis::Field(NumericField::MtowN),
            &Axis::Field(NumericField::WingArea),
            GroupBy::Type,
        );

        assert_eq!(series.len(), 1);
        let points = series.group("comercial").unwrap();
        assert_eq!(points[0].meta.name, "A");
        assert_eq!((points[0].x, points[0].y), (1000.0, 10.0));
        assert!(series.group("militar").is_none());
    }

    #[test]
    fn test_raw_and_derived_axes_are_interchangeable() {
        let mut a = record("A", Some(VehicleType::General));
        a.mtow_n = Some(9810.0);
        a.wing_area_m2 = Some(16.0);
        let records = [a];

        let derived = build_series(
            &records,
            &Axis::Field(NumericField::MtowN),
            &Axis::Derived(Derivation::WingLoading),
            GroupBy::Type,
        );
        let custom = build_series(
            &records,
            &Axis::Field(NumericField::MtowN),
            &Custom::new("wl", |r: &VehicleRecord| {
                crate::units::wing_loading(r.mtow_n, r.wing_area_m2)
            }),
            GroupBy::Type,
        );

        assert_eq!(derived.xy(), custom.xy());
        assert_eq!(derived.xy(), vec![(9810.0, 9810.0 / 16.0)]);
        assert_eq!(custom.y_label, "wl");
    }

    #[test]
    fn test_timeline_is_sorted_by_year() {
        let mut records = Vec::new();
        for (name, year, speed) in [("C", 1990, 250.0), ("A", 1950, 150.0), ("B", 1970, 200.0)] {
            let mut r = record(name, Some(VehicleType::Commercial));
            r.first_flight_year = Some(year);
            r.cruise_speed_ms = Some(speed);
            records.push(r);
        }
        let mut undated = record("D", Some(VehicleType::Commercial));
        undated.cruise_speed_ms = Some(100.0);
        records.push(undated);

        let series = build_series(
            &records,
            &Axis::Field(NumericField::FirstFlightYear),
            &Axis::Field(NumericField::CruiseSpeed),
            GroupBy::Type,
        );
        let years: Vec<f64> = series.points().map(|p| p.x).collect();
        assert_eq!(years, vec![1950.0, 1970.0, 1990.0]);
    }

    #[test]
    fn test_ungrouped_records_go_to_unknown() {
        let mut r = record("X", None);
        r.mtow = Some(100.0);
        r.range_km = Some(500.0);
        let records = [r];
        let series = build_series(
            &records,
            &Axis::Field(NumericField::Mtow),
            &Axis::Field(NumericField::Range),
            GroupBy::Type,
        );
        assert_eq!(series.group(UNKNOWN_GROUP).map(<[SeriesPoint]>::len), Some(1));
    }

    #[test]
    fn test_group_by_era() {
        let mut r = record("X", Some(VehicleType::Commercial));
        r.category_era = Some(Era::Modern);
        r.mtow = Some(100.0);
        r.range_km = Some(500.0);
        let records = [r];
        let series = build_series(
            &records,
            &Axis::Field(NumericField::Mtow),
            &Axis::Field(NumericField::Range),
            GroupBy::Era,
        );
        assert!(series.group("modern").is_some());
        assert_eq!(series.group_by, "era");
    }

    #[test]
    fn test_engine_count_zero_is_plotted() {
        let mut glider = record("Glider", Some(VehicleType::General));
        glider.engine_count = Some(0);
        glider.wingspan_m = Some(18.0);
        let records = [glider];
        let series = build_series(
            &records,
            &Axis::Field(NumericField::EngineCount),
            &Axis::Field(NumericField::Wingspan),
            GroupBy::Type,
        );
        assert_eq!(series.xy(), vec![(0.0, 18.0)]);
    }

    #[test]
    fn test_point_metadata() {
        let mut r = record("Falcon", Some(VehicleType::Bird));
        r.kind = Kind::Bird;
        r.mtow_n = Some(9.81);
        r.wing_area_m2 = Some(0.1);
        let records = [r];
        let series = build_series(
            &records,
            &Axis::Field(NumericField::MtowN),
            &Axis::Derived(Derivation::WingLoading),
            GroupBy::Type,
        );
        let meta = &series.group("ave").unwrap()[0].meta;
        assert_eq!(meta.key, "bird:falcon");
        assert_eq!(meta.mtow_n, Some(9.81));
        assert_eq!(meta.wing_area_m2, Some(0.1));
    }

    #[test]
    fn test_group_by_parse() {
        assert_eq!("engine".parse::<GroupBy>().unwrap(), GroupBy::Engine);
        assert!("colour".parse::<GroupBy>().is_err());
    }
}
