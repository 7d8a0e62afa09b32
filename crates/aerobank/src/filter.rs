//! Filtering, search and sorting over a record collection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{canonical_value, is_text_attribute, VehicleRecord};
use crate::series::{Axis, Resolve};

/// Fields searched when none are configured.
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &["name", "manufacturer"];

/// Search text plus per-field accepted values, combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    /// Attributes the search text is matched against.
    pub search_fields: Vec<String>,
    /// Accepted values per attribute. An empty set places no constraint.
    pub field_filters: BTreeMap<String, BTreeSet<String>>,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            search_fields: DEFAULT_SEARCH_FIELDS.iter().map(ToString::to_string).collect(),
            field_filters: BTreeMap::new(),
        }
    }
}

impl FilterQuery {
    /// A query that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Replace the searched attributes.
    #[must_use]
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Accept `values` for `field`, adding to any already accepted.
    ///
    /// Category aliases are stored under their canonical identifier.
    #[must_use]
    pub fn field<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let field = field.into();
        let accepted = values
            .into_iter()
            .map(|v| canonical_value(&field, v.as_ref().trim()))
            .collect::<Vec<_>>();
        self.field_filters.entry(field).or_default().extend(accepted);
        self
    }

    /// Whether the query places no constraint at all.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search.trim().is_empty() && self.field_filters.values().all(BTreeSet::is_empty)
    }

    /// Check whether `record` passes every active filter.
    #[must_use]
    pub fn matches(&self, record: &VehicleRecord) -> bool {
        self.matches_search(record) && self.matches_fields(record)
    }

    fn matches_search(&self, record: &VehicleRecord) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.search_fields.iter().any(|field| {
            record
                .attribute(field)
                .is_some_and(|value| value.to_lowercase().contains(&term))
        })
    }

    fn matches_fields(&self, record: &VehicleRecord) -> bool {
        self.field_filters.iter().all(|(field, accepted)| {
            accepted.is_empty()
                || record
                    .attribute(field)
                    .is_some_and(|value| accepted.contains(&value))
        })
    }
}

/// Parse a `FIELD=V1,V2` filter expression.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the expression has no `=` or an
/// empty field name.
pub fn parse_field_filter(expr: &str) -> Result<(String, Vec<String>)> {
    let (field, values) = expr
        .split_once('=')
        .ok_or_else(|| Error::invalid_argument(format!("expected FIELD=VALUES, got '{expr}'")))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(Error::invalid_argument(format!(
            "missing field name in '{expr}'"
        )));
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect();
    Ok((field.to_string(), values))
}

/// Records of `records` passing `query`, in their original order.
#[must_use]
pub fn apply_filters<'a>(records: &'a [VehicleRecord], query: &FilterQuery) -> Vec<&'a VehicleRecord> {
    if query.is_unconstrained() {
        debug!(total = records.len(), "No active filters");
        return records.iter().collect();
    }
    let filtered: Vec<&VehicleRecord> = records.iter().filter(|r| query.matches(r)).collect();
    debug!(
        total = records.len(),
        matched = filtered.len(),
        "Applied filters"
    );
    filtered
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, present: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => present(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort `records` in place by a numeric, derived or text attribute.
///
/// Records lacking the attribute go last in either direction. The sort is
/// stable. Text compares case-insensitively.
///
/// # Errors
///
/// Returns [`Error::UnknownField`] if `field` names neither a numeric field,
/// a derived quantity nor a text attribute.
pub fn sort_records(
    records: &mut [&VehicleRecord],
    field: &str,
    direction: SortDirection,
) -> Result<()> {
    if let Ok(axis) = field.parse::<Axis>() {
        records.sort_by(|a, b| {
            missing_last(axis.resolve(a), axis.resolve(b), |x, y| {
                direction.apply(x.total_cmp(&y))
            })
        });
    } else if is_text_attribute(field) {
        records.sort_by(|a, b| {
            let (x, y) = (
                a.attribute(field).map(|v| v.to_lowercase()),
                b.attribute(field).map(|v| v.to_lowercase()),
            );
            missing_last(x, y, |x, y| direction.apply(x.cmp(&y)))
        });
    } else {
        return Err(Error::unknown_field(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordId, VehicleType};

    fn record(id: i64, name: &str, manufacturer: Option<&str>, ty: Option<VehicleType>) -> VehicleRecord {
        let mut r = VehicleRecord::named(name);
        r.id = Some(RecordId::Int(id));
        r.manufacturer = manufacturer.map(ToString::to_string);
        r.category_type = ty;
        r
    }

    fn fleet() -> Vec<VehicleRecord> {
        vec![
            record(1, "A320", Some("Airbus"), Some(VehicleType::Commercial)),
            record(2, "F-16", Some("General Dynamics"), Some(VehicleType::Military)),
            record(3, "Mystery", None, None),
            record(4, "Mirage 2000", Some("Dassault"), Some(VehicleType::Military)),
        ]
    }

    fn names(records: &[&VehicleRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let records = fleet();
        let filtered = apply_filters(&records, &FilterQuery::new());
        assert_eq!(filtered.len(), records.len());
        assert!(filtered.iter().zip(&records).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_category_filter_excludes_missing() {
        let records = fleet();
        let query = FilterQuery::new().field("category_type", ["militar"]);
        let filtered = apply_filters(&records, &query);
        assert_eq!(names(&filtered), ["F-16", "Mirage 2000"]);
        assert!(filtered
            .iter()
            .all(|r| r.category_type == Some(VehicleType::Military)));
    }

    #[test]
    fn test_category_filter_accepts_aliases() {
        let records = fleet();
        let query = FilterQuery::new().field("category_type", ["Military", "commercial"]);
        assert_eq!(apply_filters(&records, &query).len(), 3);
    }

    #[test]
    fn test_empty_value_set_is_no_constraint() {
        let records = fleet();
        let query = FilterQuery::new().field("category_type", Vec::<String>::new());
        assert_eq!(apply_filters(&records, &query).len(), 4);
        assert!(query.is_unconstrained());
    }

    #[test]
    fn test_unconstrained_query_keeps_every_record_in_order() {
        let records = fleet();
        let query = FilterQuery::new()
            .search("   ")
            .field("no_such_field", Vec::<String>::new());
        assert!(query.is_unconstrained());
        let all: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names(&apply_filters(&records, &query)), all);

        let constrained = query.field("no_such_field", ["x"]);
        assert!(!constrained.is_unconstrained());
        assert!(apply_filters(&records, &constrained).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let records = fleet();
        let query = FilterQuery::new().search("AIRBUS");
        assert_eq!(names(&apply_filters(&records, &query)), ["A320"]);

        let query = FilterQuery::new().search("mir");
        assert_eq!(names(&apply_filters(&records, &query)), ["Mirage 2000"]);

        let query = FilterQuery::new().search("airbus").search_fields(["name"]);
        assert!(apply_filters(&records, &query).is_empty());
    }

    #[test]
    fn test_search_and_field_filters_combine_with_and() {
        let records = fleet();
        let query = FilterQuery::new()
            .search("a")
            .field("category_type", ["militar"]);
        assert_eq!(names(&apply_filters(&records, &query)), ["F-16", "Mirage 2000"]);

        let query = FilterQuery::new()
            .search("airbus")
            .field("category_type", ["militar"]);
        assert!(apply_filters(&records, &query).is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = fleet();
        let query = FilterQuery::new().search("i").field("category_type", ["militar"]);
        let once: Vec<VehicleRecord> = apply_filters(&records, &query)
            .into_iter()
            .cloned()
            .collect();
        let twice = apply_filters(&once, &query);
        assert_eq!(twice.len(), once.len());
        assert!(twice.iter().zip(&once).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_parse_field_filter() {
        let (field, values) = parse_field_filter("category_era = modern, classic").unwrap();
        assert_eq!(field, "category_era");
        assert_eq!(values, ["modern", "classic"]);
        assert!(parse_field_filter("category_era").is_err());
        assert!(parse_field_filter("=modern").is_err());
    }

    #[test]
    fn test_sort_numeric_missing_last() {
        let mut records = fleet();
        records[0].mtow = Some(78_000.0);
        records[1].mtow = Some(19_000.0);
        records[3].mtow = Some(17_000.0);

        let mut view: Vec<&VehicleRecord> = records.iter().collect();
        sort_records(&mut view, "mtow", SortDirection::Ascending).unwrap();
        assert_eq!(names(&view), ["Mirage 2000", "F-16", "A320", "Mystery"]);

        sort_records(&mut view, "mtow", SortDirection::Descending).unwrap();
        assert_eq!(names(&view), ["A320", "F-16", "Mirage 2000", "Mystery"]);
    }

    #[test]
    fn test_sort_text_is_stable() {
        let records = fleet();
        let mut view: Vec<&VehicleRecord> = records.iter().collect();
        sort_records(&mut view, "category_type", SortDirection::Ascending).unwrap();
        assert_eq!(names(&view), ["A320", "F-16", "Mirage 2000", "Mystery"]);

        sort_records(&mut view, "manufacturer", SortDirection::Descending).unwrap();
        assert_eq!(names(&view), ["F-16", "Mirage 2000", "A320", "Mystery"]);
    }

    #[test]
    fn test_sort_unknown_field() {
        let records = fleet();
        let mut view: Vec<&VehicleRecord> = records.iter().collect();
        assert!(matches!(
            sort_records(&mut view, "colour", SortDirection::Ascending),
            Err(Error::UnknownField(_))
        ));
    }
}
