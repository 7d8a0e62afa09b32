//! Dataset loading and merging.
//!
//! The aircraft and bird datasets are static JSON documents of the form
//! `{"aircraft": [...]}` and `{"birds": [...]}`. Records that fail to
//! deserialize are skipped with a warning instead of rejecting the file.
//! [`merge`] tags provenance, classifies every record and concatenates
//! aircraft before birds into a [`Databank`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::classify::classify_owned;
use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::filter::{apply_filters, FilterQuery};
use crate::record::{Kind, RecordId, VehicleRecord, VehicleType};
use crate::series::{GroupBy, Series};

/// Attribute names computed by the databank. Raw dataset values under these
/// names are dropped when records are merged.
const RESERVED_KEYS: &[&str] = &["kind", "key"];

#[derive(Debug, Deserialize)]
struct AircraftDocument {
    #[serde(default)]
    aircraft: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct BirdDocument {
    #[serde(default)]
    birds: Vec<Value>,
}

fn decode_entries(entries: Vec<Value>, source: &str) -> Vec<VehicleRecord> {
    let total = entries.len();
    let records: Vec<VehicleRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(source, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();
    debug!(source, decoded = records.len(), total, "Decoded dataset entries");
    records
}

/// Parse an aircraft dataset document.
///
/// # Errors
///
/// Returns an error if `json` is not a JSON object of the expected shape.
pub fn parse_aircraft(json: &str) -> serde_json::Result<Vec<VehicleRecord>> {
    let doc: AircraftDocument = serde_json::from_str(json)?;
    Ok(decode_entries(doc.aircraft, "aircraft"))
}

/// Parse a bird dataset document.
///
/// # Errors
///
/// Returns an error if `json` is not a JSON object of the expected shape.
pub fn parse_birds(json: &str) -> serde_json::Result<Vec<VehicleRecord>> {
    let doc: BirdDocument = serde_json::from_str(json)?;
    Ok(decode_entries(doc.birds, "birds"))
}

fn read_dataset(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::DatasetRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the aircraft dataset from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_aircraft(path: impl AsRef<Path>) -> Result<Vec<VehicleRecord>> {
    let path = path.as_ref();
    let json = read_dataset(path)?;
    let records = parse_aircraft(&json).map_err(|source| Error::DatasetParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} aircraft from {}", records.len(), path.display());
    Ok(records)
}

/// Load the bird dataset from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_birds(path: impl AsRef<Path>) -> Result<Vec<VehicleRecord>> {
    let path = path.as_ref();
    let json = read_dataset(path)?;
    let records = parse_birds(&json).map_err(|source| Error::DatasetParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} birds from {}", records.len(), path.display());
    Ok(records)
}

/// Merge the aircraft and bird datasets into one classified collection.
///
/// Aircraft come first, then birds, each in input order. Birds are forced to
/// the `ave` type before classification. `None` birds (dataset unavailable)
/// yield an aircraft-only collection. Records without an id get a positional
/// one (`#1`, `#2`, ...) within their dataset. Nothing is deduplicated.
#[must_use]
pub fn merge(aircraft: Vec<VehicleRecord>, birds: Option<Vec<VehicleRecord>>) -> Databank {
    let birds = birds.unwrap_or_else(|| {
        warn!("Bird dataset unavailable, continuing with aircraft only");
        Vec::new()
    });

    let mut records = Vec::with_capacity(aircraft.len() + birds.len());
    records.extend(tag(aircraft, Kind::Aircraft));
    records.extend(tag(birds, Kind::Bird));

    let records: Vec<VehicleRecord> = records.into_iter().map(classify_owned).collect();
    warn_duplicate_keys(&records);

    Databank { records }
}

fn tag(records: Vec<VehicleRecord>, kind: Kind) -> impl Iterator<Item = VehicleRecord> {
    records.into_iter().enumerate().map(move |(index, mut record)| {
        record.kind = kind;
        for reserved in RESERVED_KEYS {
            if let Some(value) = record.extra.remove(*reserved) {
                warn!(name = %record.name, key = *reserved, %value, "Dropping reserved dataset key");
            }
        }
        if record.id.is_none() {
            record.id = Some(RecordId::Text(format!("#{}", index + 1)));
        }
        match kind {
            Kind::Aircraft => {}
            Kind::Bird => record.category_type = Some(VehicleType::Bird),
        }
        record
    })
}

fn warn_duplicate_keys(records: &[VehicleRecord]) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let key = record.key();
        if !seen.insert(key.clone()) {
            warn!(key = %key, name = %record.name, "Duplicate record key");
        }
    }
}

/// An in-memory, classified collection of aircraft and birds.
///
/// The collection is built once by [`merge`] and read by every other
/// operation; none of them mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Databank {
    records: Vec<VehicleRecord>,
}

impl Databank {
    /// Load both datasets named by `config` and merge them.
    ///
    /// A missing or unreadable bird dataset is not fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the aircraft dataset cannot be read or parsed.
    pub fn load(config: &DataConfig) -> Result<Self> {
        let aircraft = load_aircraft(&config.aircraft_path)?;
        let birds = match &config.birds_path {
            Some(path) => match load_birds(path) {
                Ok(birds) => Some(birds),
                Err(e) => {
                    warn!(error = %e, "Failed to load bird dataset");
                    None
                }
            },
            None => None,
        };
        Ok(merge(aircraft, birds))
    }

    /// All records, aircraft first.
    #[must_use]
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, VehicleRecord> {
        self.records.iter()
    }

    /// Find a record by its namespaced key (`aircraft:12`, `bird:3`).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&VehicleRecord> {
        self.records.iter().find(|r| r.key() == key)
    }

    /// Records passing `query`, in collection order.
    #[must_use]
    pub fn filter(&self, query: &FilterQuery) -> Vec<&VehicleRecord> {
        apply_filters(&self.records, query)
    }

    /// Number of records per bucket of `group_by`.
    #[must_use]
    pub fn counts(&self, group_by: GroupBy) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(group_by.label(record)).or_insert(0) += 1;
        }
        counts
    }

    /// Number of records of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: Kind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// Build a chart series over the whole collection.
    #[must_use]
    pub fn series(&self, chart: crate::chart::ChartKind, group_by: GroupBy) -> Series {
        chart.series(&self.records, group_by)
    }
}

impl<'a> IntoIterator for &'a Databank {
    type Item = &'a VehicleRecord;
    type IntoIter = std::slice::Iter<'a, VehicleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
