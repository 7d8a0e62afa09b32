//! Flight vehicle records.
//!
//! A [`VehicleRecord`] is one aircraft or one bird as read from the static
//! JSON datasets. Every physical and performance attribute is optional:
//! absence means "unknown", never zero. Deserialization is lenient so that a
//! malformed value (a non-numeric string in a numeric field, an unrecognised
//! category name) degrades to `None` instead of rejecting the whole record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::units;

/// Declares a closed categorical enum with a canonical identifier per
/// variant and the legacy aliases accepted when parsing.
macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $canonical:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical identifier used in datasets, filters and output.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_lowercase().as_str() {
                    $($canonical $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(Error::invalid_argument(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

category_enum! {
    /// Where a record came from.
    #[derive(Default)]
    Kind {
        /// An entry of the aircraft dataset.
        #[default]
        Aircraft => "aircraft",
        /// An entry of the bird dataset.
        Bird => "bird" | "ave",
    }
}

category_enum! {
    /// Type/function bucket. Identifiers follow the dataset vocabulary.
    VehicleType {
        /// Commercial aviation.
        Commercial => "comercial" | "commercial",
        /// Business aircraft.
        Executive => "executiva" | "executive" | "business",
        /// Cargo aviation.
        Cargo => "carga" | "cargo",
        /// Military aviation.
        Military => "militar" | "military",
        /// General aviation.
        General => "geral" | "general",
        /// Historical and pioneer aircraft.
        Historical => "historica" | "historical",
        /// Experimental aircraft.
        Experimental => "experimental",
        /// Birds.
        Bird => "ave" | "bird",
    }
}

category_enum! {
    /// Era bucket derived from the first flight year.
    Era {
        /// Up to 1930.
        Pioneers => "pioneers" | "pioneiros",
        /// 1931 to 1950.
        Classic => "classic" | "classica",
        /// 1951 to 1970.
        EarlyJet => "early_jet" | "jato_inicial",
        /// 1971 to 2000.
        Modern => "modern" | "moderna",
        /// After 2000.
        Contemporary => "contemporary" | "contemporanea",
        /// Birds, which have no first flight.
        Biological => "biological" | "biologica",
    }
}

category_enum! {
    /// Size bucket derived from MTOW in kilograms.
    SizeClass {
        /// Up to 5,700 kg.
        VeryLight => "very_light" | "muito_leve",
        /// Up to 50,000 kg.
        Regional => "regional",
        /// Up to 150,000 kg.
        Medium => "medium" | "medio",
        /// Up to 300,000 kg.
        Large => "large" | "grande",
        /// Above 300,000 kg.
        VeryLarge => "very_large" | "muito_grande",
    }
}

category_enum! {
    /// Propulsion family derived from the free-text engine type.
    EngineFamily {
        /// Reciprocating piston engines.
        Piston => "piston" | "pistao",
        /// Turboprops.
        Turboprop => "turboprop" | "turboelice",
        /// Turbojets.
        Turbojet => "turbojet" | "turbojato",
        /// Turbofans.
        Turbofan => "turbofan",
        /// Electric, solar, hybrid and other special propulsion.
        Special => "special" | "especial",
        /// Birds.
        Muscular => "muscular",
        /// An engine type is given but matches no known family.
        Unknown => "unknown" | "desconhecido",
    }
}

/// Record identifier as found in the dataset: an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    /// Numeric identifier.
    Int(i64),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Int(id) => serializer.serialize_i64(*id),
            Self::Text(id) => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(n
                .as_i64()
                .map_or_else(|| Self::Text(n.to_string()), Self::Int)),
            Value::String(s) => Ok(Self::Text(s)),
            other => Err(serde::de::Error::custom(format!(
                "record id must be a number or a string, got {other}"
            ))),
        }
    }
}

/// Numeric record attributes addressable by their dataset key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    /// `mtow`, kilograms (falls back to `mtow_N / G`).
    Mtow,
    /// `mtow_N`, newtons.
    MtowN,
    /// `wing_area_m2`.
    WingArea,
    /// `wingspan_m`.
    Wingspan,
    /// `length_m`.
    Length,
    /// `height_m`.
    Height,
    /// `cruise_speed_ms`, true airspeed.
    CruiseSpeed,
    /// `takeoff_speed_ms`.
    TakeoffSpeed,
    /// `landing_speed_ms`.
    LandingSpeed,
    /// `max_speed_ms`.
    MaxSpeed,
    /// `service_ceiling_m`.
    ServiceCeiling,
    /// `cruise_altitude_m`.
    CruiseAltitude,
    /// `range_km`.
    Range,
    /// `max_thrust`, kilonewtons.
    MaxThrust,
    /// `engine_count`.
    EngineCount,
    /// `first_flight_year`.
    FirstFlightYear,
}

impl NumericField {
    /// Every numeric field.
    pub const ALL: &'static [Self] = &[
        Self::Mtow,
        Self::MtowN,
        Self::WingArea,
        Self::Wingspan,
        Self::Length,
        Self::Height,
        Self::CruiseSpeed,
        Self::TakeoffSpeed,
        Self::LandingSpeed,
        Self::MaxSpeed,
        Self::ServiceCeiling,
        Self::CruiseAltitude,
        Self::Range,
        Self::MaxThrust,
        Self::EngineCount,
        Self::FirstFlightYear,
    ];

    /// Dataset key of the field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mtow => "mtow",
            Self::MtowN => "mtow_N",
            Self::WingArea => "wing_area_m2",
            Self::Wingspan => "wingspan_m",
            Self::Length => "length_m",
            Self::Height => "height_m",
            Self::CruiseSpeed => "cruise_speed_ms",
            Self::TakeoffSpeed => "takeoff_speed_ms",
            Self::LandingSpeed => "landing_speed_ms",
            Self::MaxSpeed => "max_speed_ms",
            Self::ServiceCeiling => "service_ceiling_m",
            Self::CruiseAltitude => "cruise_altitude_m",
            Self::Range => "range_km",
            Self::MaxThrust => "max_thrust",
            Self::EngineCount => "engine_count",
            Self::FirstFlightYear => "first_flight_year",
        }
    }

    /// Whether the field is a physical magnitude that must be strictly positive
    /// to be plotted. Counts and calendar years are not.
    #[must_use]
    pub fn is_magnitude(self) -> bool {
        !matches!(self, Self::EngineCount | Self::FirstFlightYear)
    }

    /// Read the field from a record.
    #[must_use]
    pub fn value(self, record: &VehicleRecord) -> Option<f64> {
        match self {
            Self::Mtow => record.mtow_kg(),
            Self::MtowN => record.mtow_n,
            Self::WingArea => record.wing_area_m2,
            Self::Wingspan => record.wingspan_m,
            Self::Length => record.length_m,
            Self::Height => record.height_m,
            Self::CruiseSpeed => record.cruise_speed_ms,
            Self::TakeoffSpeed => record.takeoff_speed_ms,
            Self::LandingSpeed => record.landing_speed_ms,
            Self::MaxSpeed => record.max_speed_ms,
            Self::ServiceCeiling => record.service_ceiling_m,
            Self::CruiseAltitude => record.cruise_altitude_m,
            Self::Range => record.range_km,
            Self::MaxThrust => record.max_thrust,
            Self::EngineCount => record.engine_count.map(f64::from),
            Self::FirstFlightYear => record.first_flight_year.map(f64::from),
        }
    }
}

impl FromStr for NumericField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::unknown_field(s))
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text attributes usable for search, filtering and sorting.
pub const TEXT_ATTRIBUTES: &[&str] = &[
    "id",
    "key",
    "name",
    "manufacturer",
    "country",
    "engine_type",
    "kind",
    "category_type",
    "category_era",
    "category_engine",
    "category_size",
];

/// Check whether `name` is a known text attribute.
#[must_use]
pub fn is_text_attribute(name: &str) -> bool {
    TEXT_ATTRIBUTES.contains(&name)
}

/// Normalise a filter value for `field`, mapping category aliases to their
/// canonical identifier. Values of other fields are returned unchanged.
#[must_use]
pub fn canonical_value(field: &str, value: &str) -> String {
    let parsed = match field {
        "kind" => value.parse::<Kind>().ok().map(Kind::as_str),
        "category_type" => value.parse::<VehicleType>().ok().map(VehicleType::as_str),
        "category_era" => value.parse::<Era>().ok().map(Era::as_str),
        "category_engine" => value.parse::<EngineFamily>().ok().map(EngineFamily::as_str),
        "category_size" => value.parse::<SizeClass>().ok().map(SizeClass::as_str),
        _ => None,
    };
    parsed.map_or_else(|| value.to_string(), str::to_string)
}

/// One aircraft or bird.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Identifier, unique within its source dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Display name.
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,

    /// Source dataset. Set by the merger, not read from raw data.
    #[serde(default, skip_deserializing)]
    pub kind: Kind,

    /// Manufacturer, when known.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Country of origin, when known.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Maximum takeoff mass in kilograms, when the dataset carries it.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub mtow: Option<f64>,

    /// Maximum takeoff weight in newtons.
    #[serde(
        rename = "mtow_N",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub mtow_n: Option<f64>,

    /// Wing area in m².
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub wing_area_m2: Option<f64>,

    /// Wingspan in m.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub wingspan_m: Option<f64>,

    /// Length in m.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,

    /// Height in m.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub height_m: Option<f64>,

    /// Cruise true airspeed in m/s.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub cruise_speed_ms: Option<f64>,

    /// Takeoff speed in m/s.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub takeoff_speed_ms: Option<f64>,

    /// Landing speed in m/s.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub landing_speed_ms: Option<f64>,

    /// Maximum speed in m/s.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub max_speed_ms: Option<f64>,

    /// Service ceiling in m.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub service_ceiling_m: Option<f64>,

    /// Typical cruise altitude in m.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub cruise_altitude_m: Option<f64>,

    /// Range in km.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub range_km: Option<f64>,

    /// Maximum thrust in kN.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub max_thrust: Option<f64>,

    /// Number of engines.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub engine_count: Option<u32>,

    /// Free-text engine description.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<String>,

    /// Year of the first flight.
    #[serde(default, deserialize_with = "lenient_year", skip_serializing_if = "Option::is_none")]
    pub first_flight_year: Option<i32>,

    /// Type/function bucket.
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub category_type: Option<VehicleType>,

    /// Era bucket.
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub category_era: Option<Era>,

    /// Engine family bucket.
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub category_engine: Option<EngineFamily>,

    /// Size bucket.
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub category_size: Option<SizeClass>,

    /// Any other dataset keys (image URLs, descriptions, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VehicleRecord {
    /// Create a record with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Identifier namespaced by kind, e.g. `aircraft:12` or `bird:3`.
    ///
    /// Aircraft and bird datasets number their entries independently, so the
    /// raw id alone is not unique across a merged collection.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => format!("{}:{id}", self.kind),
            None => format!("{}:?", self.kind),
        }
    }

    /// MTOW in kilograms: the `mtow` field when present, otherwise `mtow_N / G`.
    #[must_use]
    pub fn mtow_kg(&self) -> Option<f64> {
        units::positive(self.mtow).or_else(|| units::positive(units::to_kg(self.mtow_n)))
    }

    /// Whether this record is a bird, by provenance or by type.
    #[must_use]
    pub fn is_bird(&self) -> bool {
        self.kind == Kind::Bird || self.category_type == Some(VehicleType::Bird)
    }

    /// Read a numeric field.
    #[must_use]
    pub fn number(&self, field: NumericField) -> Option<f64> {
        field.value(self)
    }

    /// Read an attribute as text for search, filtering and sorting.
    ///
    /// Known text attributes and numeric fields are resolved first; any other
    /// name is looked up among the extra dataset keys.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.as_ref().map(ToString::to_string),
            "key" => Some(self.key()),
            "name" => Some(self.name.clone()).filter(|n| !n.is_empty()),
            "manufacturer" => self.manufacturer.clone(),
            "country" => self.country.clone(),
            "engine_type" => self.engine_type.clone(),
            "kind" => Some(self.kind.as_str().to_string()),
            "category_type" => self.category_type.map(|c| c.as_str().to_string()),
            "category_era" => self.category_era.map(|c| c.as_str().to_string()),
            "category_engine" => self.category_engine.map(|c| c.as_str().to_string()),
            "category_size" => self.category_size.map(|c| c.as_str().to_string()),
            other => match other.parse::<NumericField>() {
                Ok(field) => field.value(self).map(|v| v.to_string()),
                Err(_) => match self.extra.get(other)? {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                },
            },
        }
    }
}

fn number_from(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_from(value.as_ref()))
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_from(value.as_ref())
        .map(f64::trunc)
        .filter(|y| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(y))
        .map(|y| y as i32))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_from(value.as_ref())
        .map(f64::trunc)
        .filter(|n| (0.0..=f64::from(u32::MAX)).contains(n))
        .map(|n| n as u32))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_category<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}
