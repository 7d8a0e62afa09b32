//! `aerobank` - An aircraft and bird flight performance databank
//!
//! This library loads aircraft and bird specifications from static JSON
//! datasets, classifies every record into era, size, engine and type buckets,
//! derives physical quantities (wing loading, aspect ratio, equivalent
//! airspeed) and turns the collection into grouped chart series with
//! power-law trendlines, plus filtered and sorted views for tables.
//!
//! ```no_run
//! use aerobank::{chart::ChartKind, series::GroupBy, trend, Config, Databank};
//!
//! # fn main() -> aerobank::Result<()> {
//! let config = Config::load()?;
//! let bank = Databank::load(&config.data)?;
//! let series = bank.series(ChartKind::WingLoadingMtow, GroupBy::Type);
//! for (group, fit) in trend::fit_groups(&series) {
//!     println!("{group}: k={:.2} n={:.2}", fit.law.coefficient, fit.law.exponent);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod chart;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod series;
pub mod trend;
pub mod units;

pub use catalog::ClassificationCatalog;
pub use classify::classify;
pub use config::Config;
pub use dataset::{merge, Databank};
pub use error::{Error, Result};
pub use filter::{apply_filters, FilterQuery};
pub use logging::init_logging;
pub use record::VehicleRecord;
pub use series::{build_series, Series};
pub use trend::{fit_power_law, sample_power_law};
