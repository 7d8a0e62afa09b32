//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::chart::ChartKind;
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::filter::{parse_field_filter, FilterQuery, SortDirection};
use crate::series::{Axis, GroupBy};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Case-insensitive text matched against the configured search fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Keep records whose FIELD is one of the values (repeatable)
    #[arg(short, long, value_name = "FIELD=V1,V2")]
    pub filter: Vec<String>,

    /// Sort by a numeric, derived or text attribute
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Build the filter query described by the arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if a filter expression is malformed.
    pub fn query(&self, search: &SearchConfig) -> Result<FilterQuery> {
        build_query(search, self.search.as_deref(), &self.filter)
    }

    /// Requested sort direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Record key, e.g. `aircraft:12` or `bird:3`
    pub key: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Series command arguments.
#[derive(Debug, Args)]
pub struct SeriesCommand {
    /// Flight-envelope diagram to build
    #[arg(long, value_enum, conflicts_with_all = ["x", "y"])]
    pub chart: Option<ChartArg>,

    /// Horizontal axis field (defaults to first_flight_year when only --y is given)
    #[arg(short, long, value_name = "FIELD", requires = "y")]
    pub x: Option<String>,

    /// Vertical axis field
    #[arg(short, long, value_name = "FIELD")]
    pub y: Option<String>,

    /// Grouping key for the points
    #[arg(short, long, value_enum, default_value = "type")]
    pub group_by: GroupByArg,

    /// Fit a power law to each group
    #[arg(long)]
    pub fit: bool,

    /// Coefficient of the theoretical scaling-law curve
    #[arg(short, long, value_name = "COEF")]
    pub k: Option<f64>,

    /// Case-insensitive text restricting the plotted records
    #[arg(short, long)]
    pub search: Option<String>,

    /// Restrict plotted records by FIELD (repeatable)
    #[arg(short, long, value_name = "FIELD=V1,V2")]
    pub filter: Vec<String>,
}

impl SeriesCommand {
    /// Resolve the requested chart.
    ///
    /// # Errors
    ///
    /// Returns an error if no chart or axis is given, or an axis name is
    /// unknown.
    pub fn chart(&self) -> Result<ChartKind> {
        match (self.chart, &self.x, &self.y) {
            (Some(chart), _, _) => Ok(chart.into()),
            (None, Some(x), Some(y)) => Ok(ChartKind::Scatter {
                x: x.parse::<Axis>()?,
                y: y.parse::<Axis>()?,
            }),
            (None, None, Some(y)) => Ok(ChartKind::Timeline {
                y: y.parse::<Axis>()?,
            }),
            (None, _, None) => Err(Error::invalid_argument(
                "either --chart or --y is required",
            )),
        }
    }

    /// Build the filter query restricting the plotted records.
    ///
    /// # Errors
    ///
    /// Returns an error if a filter expression is malformed.
    pub fn query(&self, search: &SearchConfig) -> Result<FilterQuery> {
        build_query(search, self.search.as_deref(), &self.filter)
    }
}

fn build_query(search: &SearchConfig, text: Option<&str>, filters: &[String]) -> Result<FilterQuery> {
    let mut query = search.query(text.unwrap_or_default());
    for expr in filters {
        let (field, values) = parse_field_filter(expr)?;
        query = query.field(field, values);
    }
    Ok(query)
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Flight-envelope diagram argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartArg {
    /// Wing loading against MTOW
    #[value(name = "wing_loading_mtow")]
    WingLoadingMtow,
    /// Cruise speed against MTOW
    #[value(name = "speed_mtow")]
    SpeedMtow,
    /// Equivalent cruise speed against MTOW
    #[value(name = "speed_mtow_ve")]
    SpeedMtowVe,
    /// Wing loading against cruise speed
    #[value(name = "wing_loading_speed")]
    WingLoadingSpeed,
    /// Wing loading against equivalent cruise speed
    #[value(name = "wing_loading_speed_ve")]
    WingLoadingSpeedVe,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::WingLoadingMtow => Self::WingLoadingMtow,
            ChartArg::SpeedMtow => Self::SpeedMtow,
            ChartArg::SpeedMtowVe => Self::SpeedMtowEquivalent,
            ChartArg::WingLoadingSpeed => Self::WingLoadingSpeed,
            ChartArg::WingLoadingSpeedVe => Self::WingLoadingSpeedEquivalent,
        }
    }
}

/// Grouping key argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GroupByArg {
    /// Type/function
    #[default]
    Type,
    /// Era
    Era,
    /// Engine family
    Engine,
    /// Size
    Size,
    /// Aircraft or bird
    Kind,
}

impl From<GroupByArg> for GroupBy {
    fn from(arg: GroupByArg) -> Self {
        match arg {
            GroupByArg::Type => Self::Type,
            GroupByArg::Era => Self::Era,
            GroupByArg::Engine => Self::Engine,
            GroupByArg::Size => Self::Size,
            GroupByArg::Kind => Self::Kind,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NumericField;

    fn series_command() -> SeriesCommand {
        SeriesCommand {
            chart: None,
            x: None,
            y: None,
            group_by: GroupByArg::Type,
            fit: false,
            k: None,
            search: None,
            filter: Vec::new(),
        }
    }

    #[test]
    fn test_chart_arg_conversion() {
        assert_eq!(
            ChartKind::from(ChartArg::SpeedMtowVe),
            ChartKind::SpeedMtowEquivalent
        );
        assert_eq!(
            ChartKind::from(ChartArg::WingLoadingSpeedVe),
            ChartKind::WingLoadingSpeedEquivalent
        );
    }

    #[test]
    fn test_group_by_arg_conversion() {
        assert_eq!(GroupBy::from(GroupByArg::Era), GroupBy::Era);
        assert_eq!(GroupBy::from(GroupByArg::default()), GroupBy::Type);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_series_chart_resolution() {
        let mut cmd = series_command();
        assert!(cmd.chart().is_err());

        cmd.y = Some("cruise_speed_ms".to_string());
        assert_eq!(
            cmd.chart().unwrap(),
            ChartKind::Timeline {
                y: Axis::Field(NumericField::CruiseSpeed)
            }
        );

        cmd.x = Some("mtow".to_string());
        assert!(matches!(cmd.chart().unwrap(), ChartKind::Scatter { .. }));

        cmd.x = Some("bogus".to_string());
        assert!(matches!(cmd.chart(), Err(Error::UnknownField(_))));

        cmd.chart = Some(ChartArg::WingLoadingMtow);
        assert_eq!(cmd.chart().unwrap(), ChartKind::WingLoadingMtow);
    }

    #[test]
    fn test_list_query() {
        let cmd = ListCommand {
            search: Some("boeing".to_string()),
            filter: vec!["category_era=modern,Contemporary".to_string()],
            sort: None,
            desc: false,
            limit: None,
            format: OutputFormat::Table,
        };
        let query = cmd.query(&SearchConfig::default()).unwrap();
        assert_eq!(query.search, "boeing");
        let accepted = &query.field_filters["category_era"];
        assert!(accepted.contains("modern"));
        assert!(accepted.contains("contemporary"));
        assert_eq!(cmd.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_list_query_rejects_malformed_filter() {
        let cmd = ListCommand {
            search: None,
            filter: vec!["category_era".to_string()],
            sort: None,
            desc: false,
            limit: None,
            format: OutputFormat::Plain,
        };
        assert!(cmd.query(&SearchConfig::default()).is_err());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
