//! Configuration management for aerobank.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::chart::{ChartKind, WING_LOADING_MTOW_LAW, WING_LOADING_SPEED_LAW};
use crate::error::{Error, Result};
use crate::filter::{FilterQuery, DEFAULT_SEARCH_FIELDS};
use crate::record::{is_text_attribute, NumericField};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the platform config directory.
const APP_DIR_NAME: &str = "aerobank";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "AEROBANK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `AEROBANK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/aerobank/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset locations.
    pub data: DataConfig,
    /// Trendline parameters.
    pub trendline: TrendlineConfig,
    /// Search behaviour.
    pub search: SearchConfig,
}

/// Dataset locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Aircraft dataset. Required.
    pub aircraft_path: PathBuf,
    /// Bird dataset. Loading continues without it if absent or unreadable.
    pub birds_path: Option<PathBuf>,
    /// Classification labels and colors.
    pub classifications_path: Option<PathBuf>,
}

/// Theoretical trendline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendlineConfig {
    /// Coefficient of wing loading against MTOW.
    pub wing_loading_mtow_k: f64,
    /// Coefficient of wing loading against airspeed.
    pub wing_loading_speed_k: f64,
    /// Points sampled per curve.
    pub samples: usize,
}

/// Search behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Attributes matched by the search text.
    pub fields: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            aircraft_path: PathBuf::from("data/processed/aircraft_processed.json"),
            birds_path: Some(PathBuf::from("data/processed/birds_processed.json")),
            classifications_path: Some(PathBuf::from("data/classifications.json")),
        }
    }
}

impl Default for TrendlineConfig {
    fn default() -> Self {
        Self {
            wing_loading_mtow_k: WING_LOADING_MTOW_LAW.default_coefficient,
            wing_loading_speed_k: WING_LOADING_SPEED_LAW.default_coefficient,
            samples: 100,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_SEARCH_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl TrendlineConfig {
    /// Configured coefficient for `chart`'s scaling law, if it has one.
    #[must_use]
    pub fn coefficient_for(&self, chart: ChartKind) -> Option<f64> {
        match chart {
            ChartKind::WingLoadingMtow => Some(self.wing_loading_mtow_k),
            ChartKind::WingLoadingSpeed | ChartKind::WingLoadingSpeedEquivalent => {
                Some(self.wing_loading_speed_k)
            }
            _ => None,
        }
    }
}

impl SearchConfig {
    /// A query searching `text` over the configured fields.
    #[must_use]
    pub fn query(&self, text: impl Into<String>) -> FilterQuery {
        FilterQuery::new()
            .search(text)
            .search_fields(self.fields.iter().cloned())
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.trendline.samples < 2 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "trendline.samples must be at least 2, got {}",
                    self.trendline.samples
                ),
            });
        }

        for (name, k) in [
            ("wing_loading_mtow_k", self.trendline.wing_loading_mtow_k),
            ("wing_loading_speed_k", self.trendline.wing_loading_speed_k),
        ] {
            if !(k.is_finite() && k > 0.0) {
                return Err(Error::ConfigValidation {
                    message: format!("trendline.{name} must be a positive number, got {k}"),
                });
            }
        }

        if self.search.fields.is_empty() {
            return Err(Error::ConfigValidation {
                message: "search.fields must not be empty".to_string(),
            });
        }

        for field in &self.search.fields {
            if !is_text_attribute(field) && field.parse::<NumericField>().is_err() {
                return Err(Error::ConfigValidation {
                    message: format!("unknown search field: {field}"),
                });
            }
        }

        Ok(())
    }
}
