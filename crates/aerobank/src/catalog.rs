//! Classification metadata: display labels and colors per category value.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

/// Color used for values without a configured color.
pub const DEFAULT_COLOR: &str = "#777777";

/// One selectable value of a classification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassOption {
    /// Canonical value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// A named classification, e.g. `era` over `category_era`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classification {
    /// Classification identifier.
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Record attribute the classification reads.
    #[serde(default)]
    pub field: Option<String>,
    /// Known values.
    #[serde(default)]
    pub options: Vec<ClassOption>,
}

/// Contents of a `classifications.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClassificationCatalog {
    /// All classifications.
    #[serde(default)]
    pub classifications: Vec<Classification>,
    /// Colors per classification id, then per value.
    #[serde(rename = "colorSchemes", default)]
    pub color_schemes: BTreeMap<String, BTreeMap<String, String>>,
}

impl ClassificationCatalog {
    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid catalog.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::DatasetRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Self = serde_json::from_str(&json).map_err(|source| Error::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Loaded {} classifications from {}",
            catalog.classifications.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Find a classification by id.
    #[must_use]
    pub fn classification(&self, id: &str) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.id == id)
    }

    /// Display label of `value`, or `value` itself when unknown.
    #[must_use]
    pub fn label_for<'a>(&'a self, classification_id: &str, value: &'a str) -> &'a str {
        self.classification(classification_id)
            .and_then(|c| c.options.iter().find(|o| o.value == value))
            .map_or(value, |o| o.label.as_str())
    }

    /// Color of `value`, or [`DEFAULT_COLOR`] when none is configured.
    #[must_use]
    pub fn color_for(&self, classification_id: &str, value: &str) -> &str {
        self.color_schemes
            .get(classification_id)
            .and_then(|scheme| scheme.get(value))
            .map_or(DEFAULT_COLOR, String::as_str)
    }
}
