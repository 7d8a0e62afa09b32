//! `aerobank` - CLI for the aircraft and bird performance databank
//!
//! This binary loads the configured datasets and exposes listing, lookup,
//! charting and summary commands over them.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::warn;

use aerobank::cli::{Cli, Command, ConfigCommand, ListCommand, OutputFormat, SeriesCommand};
use aerobank::filter::sort_records;
use aerobank::metrics::DerivedMetrics;
use aerobank::record::{Kind, VehicleRecord};
use aerobank::series::GroupBy;
use aerobank::trend::{fit_groups, theoretical_trendline};
use aerobank::{init_logging, ClassificationCatalog, Config, Databank};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    if let Command::Config(config_cmd) = &cli.command {
        return handle_config(cli.config.clone(), config_cmd);
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let bank = Databank::load(&config.data).context("loading datasets")?;

    match cli.command {
        Command::List(cmd) => handle_list(&bank, &config, &cmd),
        Command::Show(cmd) => handle_show(&bank, &cmd.key, cmd.json),
        Command::Series(cmd) => handle_series(&bank, &config, &cmd),
        Command::Stats(cmd) => handle_stats(&bank, &config, cmd.json),
        Command::Config(_) => Ok(()),
    }
}

fn cell(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn handle_list(bank: &Databank, config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let query = cmd.query(&config.search)?;
    let mut records = bank.filter(&query);
    if let Some(field) = &cmd.sort {
        sort_records(&mut records, field, cmd.direction())?;
    }
    if let Some(limit) = cmd.limit {
        records.truncate(limit);
    }

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Plain => {
            for record in &records {
                println!("{}\t{}", record.key(), record.name);
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<16} {:<32} {:<20} {:<12} {:<13} {:<11} {:>12}",
                "KEY", "NAME", "MANUFACTURER", "TYPE", "ERA", "SIZE", "MTOW (kg)"
            );
            println!("{}", "-".repeat(121));
            for record in &records {
                println!(
                    "{:<16} {:<32} {:<20} {:<12} {:<13} {:<11} {:>12}",
                    record.key(),
                    truncate(&record.name, 32),
                    truncate(&cell(record.manufacturer.clone()), 20),
                    cell(record.attribute("category_type")),
                    cell(record.attribute("category_era")),
                    cell(record.attribute("category_size")),
                    number(record.mtow_kg()),
                );
            }
            println!();
            println!("{} of {} records", records.len(), bank.len());
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn handle_show(bank: &Databank, key: &str, json: bool) -> anyhow::Result<()> {
    let Some(record) = bank.get(key) else {
        bail!("no record with key '{key}'");
    };
    let metrics = DerivedMetrics::of(record);

    if json {
        let out = serde_json::json!({
            "record": record,
            "derived": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_record(record, &metrics);
    Ok(())
}

fn print_record(record: &VehicleRecord, metrics: &DerivedMetrics) {
    println!("{}", record.name);
    println!("{}", "=".repeat(record.name.chars().count().max(8)));
    println!();
    println!("[Identity]");
    println!("  Key:             {}", record.key());
    println!("  Manufacturer:    {}", cell(record.manufacturer.clone()));
    println!("  Country:         {}", cell(record.country.clone()));
    println!("  First flight:    {}", cell(record.attribute("first_flight_year")));
    println!();
    println!("[Classification]");
    println!("  Type:            {}", cell(record.attribute("category_type")));
    println!("  Era:             {}", cell(record.attribute("category_era")));
    println!("  Size:            {}", cell(record.attribute("category_size")));
    println!("  Engine:          {}", cell(record.attribute("category_engine")));
    println!();
    println!("[Derived]");
    println!("  MTOW (kg):       {}", number(metrics.mtow_kg));
    println!("  Wing loading:    {} N/m²", number(metrics.wing_loading));
    println!("  Aspect ratio:    {}", number(metrics.aspect_ratio));
    println!("  Cruise (km/h):   {}", number(metrics.cruise_speed_kmh));
    println!("  Cruise VE (m/s): {}", number(metrics.equivalent_airspeed));
}

fn handle_series(bank: &Databank, config: &Config, cmd: &SeriesCommand) -> anyhow::Result<()> {
    let chart = cmd.chart()?;
    let query = cmd.query(&config.search)?;
    let records = bank.filter(&query);
    let series = chart.series(records.iter().copied(), cmd.group_by.into());

    let fits = (cmd.fit && chart.allows_trendline()).then(|| fit_groups(&series));
    let k = cmd.k.or_else(|| config.trendline.coefficient_for(chart));
    let trendline = theoretical_trendline(chart, k, config.trendline.samples)?;

    let out = serde_json::json!({
        "chart": chart.to_string(),
        "series": series,
        "fits": fits,
        "trendline": trendline,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn load_catalog(config: &Config) -> Option<ClassificationCatalog> {
    let path = config.data.classifications_path.as_ref()?;
    if !path.exists() {
        return None;
    }
    match ClassificationCatalog::load(path) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!(error = %e, "Failed to load classifications");
            None
        }
    }
}

fn handle_stats(bank: &Databank, config: &Config, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(config).unwrap_or_default();
    let groups: BTreeMap<&str, BTreeMap<String, usize>> = GroupBy::ALL
        .iter()
        .filter(|g| **g != GroupBy::Kind)
        .map(|g| (g.name(), bank.counts(*g)))
        .collect();

    if json {
        let out = serde_json::json!({
            "total": bank.len(),
            "aircraft": bank.count_kind(Kind::Aircraft),
            "birds": bank.count_kind(Kind::Bird),
            "groups": groups,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("aerobank stats");
    println!("--------------");
    println!("Records:       {}", bank.len());
    println!("Aircraft:      {}", bank.count_kind(Kind::Aircraft));
    println!("Birds:         {}", bank.count_kind(Kind::Bird));
    for (name, counts) in &groups {
        println!();
        println!("[{name}]");
        for (value, count) in counts {
            println!(
                "  {:<28} {:>6}  {}",
                catalog.label_for(name, value),
                count,
                catalog.color_for(name, value)
            );
        }
    }
    Ok(())
}

fn handle_config(path: Option<std::path::PathBuf>, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(path)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Data]");
                println!("  Aircraft:          {}", config.data.aircraft_path.display());
                println!(
                    "  Birds:             {}",
                    cell(config.data.birds_path.as_ref().map(|p| p.display().to_string()))
                );
                println!(
                    "  Classifications:   {}",
                    cell(
                        config
                            .data
                            .classifications_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                    )
                );
                println!();
                println!("[Trendline]");
                println!("  Wing loading/MTOW k:  {}", config.trendline.wing_loading_mtow_k);
                println!("  Wing loading/speed k: {}", config.trendline.wing_loading_speed_k);
                println!("  Samples:              {}", config.trendline.samples);
                println!();
                println!("[Search]");
                println!("  Fields:            {}", config.search.fields.join(", "));
            }
        }
        ConfigCommand::Path => {
            println!(
                "{}",
                path.unwrap_or_else(Config::default_config_path).display()
            );
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .clone()
                .or(path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
