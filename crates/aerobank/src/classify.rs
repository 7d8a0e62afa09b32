//! Record classification.
//!
//! Assigns the categorical buckets (type, era, engine family, size) to a
//! record. Classification never mutates its input: [`classify`] returns a new
//! record and leaves any bucket already present in the raw data untouched.
//!
//! Precedence:
//!
//! 1. Birds (`category_type == ave`) get the fixed biological buckets and
//!    nothing else is evaluated.
//! 2. Size from MTOW in kilograms, via [`SIZE_TABLE`].
//! 3. Era from the first flight year, via [`ERA_TABLE`].
//! 4. Engine family from the engine type text, via [`ENGINE_TABLE`].
//!
//! Aircraft without a `category_type` additionally get one from name
//! keywords, see [`TYPE_KEYWORDS`].

use tracing::trace;

use crate::record::{EngineFamily, Era, Kind, SizeClass, VehicleRecord, VehicleType};

/// Ordered `value <= threshold` rules with a catch-all bucket for values above
/// the last finite threshold.
#[derive(Debug)]
pub struct ThresholdTable<T: 'static> {
    /// `(inclusive upper bound, bucket)` pairs in ascending order.
    pub rules: &'static [(f64, T)],
    /// Bucket for values above every threshold.
    pub above: T,
}

impl<T: Copy> ThresholdTable<T> {
    /// Bucket for `value`, or `None` when the value is absent or not finite.
    #[must_use]
    pub fn lookup(&self, value: Option<f64>) -> Option<T> {
        let value = value.filter(|v| v.is_finite())?;
        let bucket = self
            .rules
            .iter()
            .find(|(threshold, _)| value <= *threshold)
            .map_or(self.above, |(_, bucket)| *bucket);
        Some(bucket)
    }
}

/// Ordered substring rules; the first key contained in the lower-cased input
/// wins, and non-empty input matching no key gets `unmatched`.
#[derive(Debug)]
pub struct KeywordTable<T: 'static> {
    /// `(keyword, bucket)` pairs, most specific first.
    pub rules: &'static [(&'static str, T)],
    /// Bucket for non-empty text that matches no keyword.
    pub unmatched: T,
}

impl<T: Copy> KeywordTable<T> {
    /// Bucket for `text`, or `None` when the text is absent or blank.
    #[must_use]
    pub fn lookup(&self, text: Option<&str>) -> Option<T> {
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;
        let lower = text.to_lowercase();
        let bucket = self
            .rules
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map_or(self.unmatched, |(_, bucket)| *bucket);
        Some(bucket)
    }
}

/// MTOW in kilograms to size bucket.
pub const SIZE_TABLE: ThresholdTable<SizeClass> = ThresholdTable {
    rules: &[
        (5_700.0, SizeClass::VeryLight),
        (50_000.0, SizeClass::Regional),
        (150_000.0, SizeClass::Medium),
        (300_000.0, SizeClass::Large),
    ],
    above: SizeClass::VeryLarge,
};

/// First flight year to era bucket.
pub const ERA_TABLE: ThresholdTable<Era> = ThresholdTable {
    rules: &[
        (1930.0, Era::Pioneers),
        (1950.0, Era::Classic),
        (1970.0, Era::EarlyJet),
        (2000.0, Era::Modern),
    ],
    above: Era::Contemporary,
};

/// Engine type text to engine family. Specific turbine names precede the bare
/// `turbo` prefix so that turbojets and turbofans stay reachable.
pub const ENGINE_TABLE: KeywordTable<EngineFamily> = KeywordTable {
    rules: &[
        ("pist", EngineFamily::Piston),
        ("turbofan", EngineFamily::Turbofan),
        ("turbojet", EngineFamily::Turbojet),
        ("turbojato", EngineFamily::Turbojet),
        ("turboprop", EngineFamily::Turboprop),
        ("turboélice", EngineFamily::Turboprop),
        ("turboelice", EngineFamily::Turboprop),
        ("turbo", EngineFamily::Turboprop),
        ("special", EngineFamily::Special),
        ("especial", EngineFamily::Special),
        ("electric", EngineFamily::Special),
        ("elétrico", EngineFamily::Special),
        ("solar", EngineFamily::Special),
        ("hybrid", EngineFamily::Special),
        ("híbrido", EngineFamily::Special),
    ],
    unmatched: EngineFamily::Unknown,
};

/// Name keywords to type bucket, evaluated in order.
pub const TYPE_KEYWORDS: &[(VehicleType, &[&str])] = &[
    (
        VehicleType::Historical,
        &["wright flyer", "santos-dumont", "14-bis"],
    ),
    (
        VehicleType::Military,
        &["f-", "mirage", "mig", "sukhoi", "c-130", "hercules"],
    ),
    (
        VehicleType::Executive,
        &["citation", "learjet", "gulfstream", "challenger", "phenom", "king air"],
    ),
    (VehicleType::Cargo, &["freighter", "cargo"]),
    (
        VehicleType::General,
        &["cessna", "piper", "beechcraft", "cirrus"],
    ),
    (
        VehicleType::Commercial,
        &["airbus", "boeing", "embraer", "bombardier", "atr", "douglas"],
    ),
];

/// General aviation names only count below this MTOW (kg).
const GENERAL_AVIATION_MAX_KG: f64 = 5_700.0;

/// Type bucket inferred from an aircraft's name, if any keyword matches.
#[must_use]
pub fn type_from_name(name: &str, mtow_kg: Option<f64>) -> Option<VehicleType> {
    let lower = name.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .filter(|(bucket, _)| {
            *bucket != VehicleType::General
                || mtow_kg.map_or(true, |kg| kg < GENERAL_AVIATION_MAX_KG)
        })
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(bucket, _)| *bucket)
}

/// Classify a record, returning a new record with its buckets filled in.
#[must_use]
pub fn classify(record: &VehicleRecord) -> VehicleRecord {
    let mut out = record.clone();
    classify_in_place(&mut out);
    out
}

/// Classify an owned record without cloning it.
#[must_use]
pub fn classify_owned(mut record: VehicleRecord) -> VehicleRecord {
    classify_in_place(&mut record);
    record
}

fn classify_in_place(record: &mut VehicleRecord) {
    if record.category_type.is_none() {
        match record.kind {
            Kind::Aircraft => {
                record.category_type = type_from_name(&record.name, record.mtow_kg());
            }
            Kind::Bird => {}
        }
    }

    if record.category_type == Some(VehicleType::Bird) {
        record.category_era = Some(Era::Biological);
        record.category_engine = Some(EngineFamily::Muscular);
        record.category_size = Some(SizeClass::VeryLight);
        trace!(key = %record.key(), "Applied biological classification");
        return;
    }

    if record.category_size.is_none() {
        record.category_size = SIZE_TABLE.lookup(record.mtow_kg());
    }

    if record.category_era.is_none() {
        record.category_era = ERA_TABLE.lookup(record.first_flight_year.map(f64::from));
    }

    if record.category_engine.is_none() {
        record.category_engine = ENGINE_TABLE.lookup(record.engine_type.as_deref());
    }

    trace!(
        key = %record.key(),
        size = ?record.category_size,
        era = ?record.category_era,
        engine = ?record.category_engine,
        "Classified record"
    );
}
