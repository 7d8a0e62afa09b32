//! End-to-end tests: JSON files on disk through to series, fits and views.

use std::fs;
use std::path::Path;

use aerobank::chart::ChartKind;
use aerobank::config::DataConfig;
use aerobank::filter::{sort_records, FilterQuery, SortDirection};
use aerobank::record::{EngineFamily, Era, Kind, SizeClass, VehicleType};
use aerobank::series::GroupBy;
use aerobank::trend::{fit_groups, theoretical_trendline};
use aerobank::{Databank, Error};

const AIRCRAFT: &str = r#"{
    "aircraft": [
        {
            "id": 1, "name": "Boeing 737-800", "manufacturer": "Boeing",
            "mtow": 79016, "mtow_N": 775147, "wing_area_m2": 124.6, "wingspan_m": 35.8,
            "cruise_speed_ms": 230, "cruise_altitude_m": 11000,
            "first_flight_year": 1997, "engine_type": "Turbofan"
        },
        {
            "id": 2, "name": "Cessna 172", "manufacturer": "Cessna",
            "mtow": 1111, "mtow_N": 10899, "wing_area_m2": 16.2, "wingspan_m": 11.0,
            "cruise_speed_ms": 63, "cruise_altitude_m": 2500,
            "first_flight_year": 1955, "engine_type": "Piston"
        },
        {
            "id": 3, "name": "F-16 Fighting Falcon", "manufacturer": "General Dynamics",
            "category_type": "militar",
            "mtow_N": 188000, "wing_area_m2": 27.87,
            "cruise_speed_ms": 250, "first_flight_year": 1974, "engine_type": "turbofan"
        },
        {
            "id": 4, "name": "Airbus A380", "manufacturer": "Airbus",
            "mtow": 575000, "mtow_N": 5640750, "wing_area_m2": 845,
            "cruise_speed_ms": 250, "cruise_altitude_m": 12000,
            "first_flight_year": 2005, "engine_type": "Turbofan"
        },
        {
            "id": 5, "name": "Lockheed Constellation", "manufacturer": "Lockheed",
            "mtow": "unknown", "first_flight_year": 1943, "engine_type": "pistão radial"
        }
    ]
}"#;

const BIRDS: &str = r#"{
    "birds": [
        {"id": 1, "name": "Peregrine Falcon", "mtow_N": 9.81, "wing_area_m2": 0.1,
         "wingspan_m": 1.0, "cruise_speed_ms": 25},
        {"id": 2, "name": "Wandering Albatross", "category_type": "comercial",
         "mtow_N": 98.1, "wing_area_m2": 0.6, "cruise_speed_ms": 15}
    ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn load_bank() -> Databank {
    let dir = tempfile::tempdir().unwrap();
    let config = DataConfig {
        aircraft_path: write(dir.path(), "aircraft.json", AIRCRAFT),
        birds_path: Some(write(dir.path(), "birds.json", BIRDS)),
        classifications_path: None,
    };
    Databank::load(&config).unwrap()
}

#[test]
fn test_load_merges_and_classifies() {
    let bank = load_bank();
    assert_eq!(bank.len(), 7);
    assert_eq!(bank.count_kind(Kind::Aircraft), 5);
    assert_eq!(bank.count_kind(Kind::Bird), 2);

    let boeing = bank.get("aircraft:1").unwrap();
    assert_eq!(boeing.category_type, Some(VehicleType::Commercial));
    assert_eq!(boeing.category_size, Some(SizeClass::Medium));
    assert_eq!(boeing.category_era, Some(Era::Modern));
    assert_eq!(boeing.category_engine, Some(EngineFamily::Turbofan));

    let cessna = bank.get("aircraft:2").unwrap();
    assert_eq!(cessna.category_type, Some(VehicleType::General));
    assert_eq!(cessna.category_engine, Some(EngineFamily::Piston));
    assert_eq!(cessna.category_era, Some(Era::EarlyJet));

    let constellation = bank.get("aircraft:5").unwrap();
    assert_eq!(constellation.mtow, None);
    assert_eq!(constellation.category_size, None);
    assert_eq!(constellation.category_era, Some(Era::Classic));
    assert_eq!(constellation.category_engine, Some(EngineFamily::Piston));

    for key in ["bird:1", "bird:2"] {
        let bird = bank.get(key).unwrap();
        assert_eq!(bird.category_type, Some(VehicleType::Bird));
        assert_eq!(bird.category_era, Some(Era::Biological));
        assert_eq!(bird.category_engine, Some(EngineFamily::Muscular));
        assert_eq!(bird.category_size, Some(SizeClass::VeryLight));
    }
}

#[test]
fn test_missing_bird_dataset_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = DataConfig {
        aircraft_path: write(dir.path(), "aircraft.json", AIRCRAFT),
        birds_path: Some(dir.path().join("absent.json")),
        classifications_path: None,
    };
    let bank = Databank::load(&config).unwrap();
    assert_eq!(bank.len(), 5);
    assert_eq!(bank.count_kind(Kind::Bird), 0);
}

#[test]
fn test_missing_aircraft_dataset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = DataConfig {
        aircraft_path: dir.path().join("absent.json"),
        birds_path: None,
        classifications_path: None,
    };
    assert!(matches!(
        Databank::load(&config),
        Err(Error::DatasetRead { .. })
    ));

    let bad = write(dir.path(), "bad.json", "{ not json");
    let config = DataConfig {
        aircraft_path: bad,
        birds_path: None,
        classifications_path: None,
    };
    assert!(matches!(
        Databank::load(&config),
        Err(Error::DatasetParse { .. })
    ));
}

#[test]
fn test_wing_loading_chart_with_fits_and_scaling_law() {
    let bank = load_bank();
    let series = bank.series(ChartKind::WingLoadingMtow, GroupBy::Type);

    // Constellation lacks weight and area
    assert_eq!(series.len(), 6);
    assert_eq!(series.group("ave").map(<[_]>::len), Some(2));

    let fits = fit_groups(&series);
    assert!(fits.contains_key("ave"));
    assert!(fits.contains_key("comercial"));
    assert!(!fits.contains_key("militar"));

    let curve = theoretical_trendline(ChartKind::WingLoadingMtow, None, 100)
        .unwrap()
        .unwrap();
    assert_eq!(curve.len(), 100);
    assert!(curve.windows(2).all(|w| w[0].x < w[1].x && w[0].y < w[1].y));
}

#[test]
fn test_speed_chart_never_gets_trendline() {
    let bank = load_bank();
    let series = bank.series(ChartKind::SpeedMtow, GroupBy::Kind);
    assert_eq!(series.group("bird").map(<[_]>::len), Some(2));
    assert!(!ChartKind::SpeedMtow.allows_trendline());
    assert!(theoretical_trendline(ChartKind::SpeedMtow, Some(3.0), 100)
        .unwrap()
        .is_none());
}

#[test]
fn test_filter_search_and_sort() {
    let bank = load_bank();

    let militar = bank.filter(&FilterQuery::new().field("category_type", ["militar"]));
    assert_eq!(militar.len(), 1);
    assert_eq!(militar[0].name, "F-16 Fighting Falcon");

    let falcons = bank.filter(&FilterQuery::new().search("falcon"));
    let keys: Vec<String> = falcons.iter().map(|r| r.key()).collect();
    assert_eq!(keys, ["aircraft:3", "bird:1"]);

    let mut heavy = bank.filter(
        &FilterQuery::new().field("category_size", ["medium", "very_large", "large"]),
    );
    sort_records(&mut heavy, "mtow", SortDirection::Descending).unwrap();
    let names: Vec<&str> = heavy.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Airbus A380", "Boeing 737-800"]);
}

#[test]
fn test_timeline_is_year_ordered() {
    let bank = load_bank();
    let chart = ChartKind::Timeline {
        y: "cruise_speed_ms".parse().unwrap(),
    };
    let series = bank.series(chart, GroupBy::Kind);
    let years: Vec<f64> = series.group("aircraft").unwrap().iter().map(|p| p.x).collect();
    assert_eq!(years, [1955.0, 1974.0, 1997.0, 2005.0]);
}
