//! End-to-end tests of the event detection stage

use chrono::{DateTime, Duration, TimeZone, Utc};
use lakesim_core::{Error, Field, FrameReader, Grid, MemoryReader};
use lakesim_events::{run_stage, run_stage_with, StageOptions, StageOutcome};
use serde_json::{json, Value};
use std::cell::Cell;
use std::fs;
use std::path::Path;

fn hour(h: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap() + Duration::hours(h)
}

fn write_properties(folder: &Path, properties: Value) {
    fs::write(
        folder.join("properties.json"),
        serde_json::to_string_pretty(&properties).unwrap(),
    )
    .unwrap();
}

/// Hourly surface temperatures: split frames at the given hours, uniform otherwise
fn temperature_readers(hours: i64, split: impl Fn(i64) -> bool) -> Vec<Box<dyn FrameReader>> {
    let mut reader = MemoryReader::new("20240602.nc", vec![0.0, -1.0, -3.0]);
    for h in 0..hours {
        let t = reader.push_time(hour(h));
        let grid = if split(h) {
            Grid::from_rows(vec![vec![9.0, 9.0], vec![14.0, 14.0]]).unwrap()
        } else {
            Grid::from_rows(vec![vec![12.0, 12.5], vec![12.5, 12.0]]).unwrap()
        };
        for layer in 0..3 {
            reader.insert(Field::Temperature, t, layer, grid.clone());
        }
    }
    vec![Box::new(reader)]
}

fn upwelling_definition() -> Value {
    json!({
        "type": "upwelling",
        "description": "Surface upwelling",
        "depth": 1,
        "centroid_difference": 2.0,
        "merge": 2
    })
}

#[test]
fn test_missing_events_key_skips_stage() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(dir.path(), json!({"model": "delft3d-flow"}));

    let opened = Cell::new(false);
    let outcome = run_stage_with(&StageOptions::new(dir.path()), |_, _| {
        opened.set(true);
        Ok(Vec::new())
    })
    .unwrap();

    assert_eq!(outcome, StageOutcome::Skipped);
    assert!(!opened.get());
    assert!(!dir.path().join("events.json").exists());
}

#[test]
fn test_events_written_to_folder() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(dir.path(), json!({"events": [upwelling_definition()]}));

    let outcome = run_stage_with(&StageOptions::new(dir.path()), |_, _| {
        Ok(temperature_readers(12, |h| (2..=3).contains(&h) || (5..=6).contains(&h)))
    })
    .unwrap();

    let path = dir.path().join("events.json");
    assert_eq!(outcome, StageOutcome::Written { path: path.clone(), events: 1 });

    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!([{
            "type": "upwelling",
            "description": "Surface upwelling",
            "start": "2024-06-02T02:00:00Z",
            "end": "2024-06-02T06:00:00Z",
            "properties": {"peak": "2024-06-02T02:00:00Z", "max_centroid": 5.0},
            "parameters": {"depth": 1, "centroid_difference": 2.0, "merge": 2}
        }])
    );
}

#[test]
fn test_output_override() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(dir.path(), json!({"events": [upwelling_definition()]}));

    let mut options = StageOptions::new(dir.path());
    options.output = Some("detected.json".into());
    run_stage_with(&options, |_, _| Ok(temperature_readers(3, |_| false))).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("detected.json")).unwrap(), "[]");
    assert!(!dir.path().join("events.json").exists());
}

#[test]
fn test_grid_overrides_reach_reader() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(
        dir.path(),
        json!({"events": [upwelling_definition()], "grid": {"temperature": "R1", "depth": "ZK"}}),
    );

    run_stage_with(&StageOptions::new(dir.path()), |folder, variables| {
        assert_eq!(folder, dir.path());
        assert_eq!(variables.temperature, "R1");
        assert_eq!(variables.depth, "ZK");
        assert_eq!(variables.u, "u");
        Ok(temperature_readers(2, |_| false))
    })
    .unwrap();
}

#[test]
fn test_unsupported_detector_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(
        dir.path(),
        json!({"events": [upwelling_definition(), {"type": "seiche", "depth": 1}]}),
    );

    let opened = Cell::new(false);
    let err = run_stage_with(&StageOptions::new(dir.path()), |_, _| {
        opened.set(true);
        Ok(temperature_readers(2, |_| true))
    })
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::UnsupportedDetector(tag)) if tag == "seiche"
    ));
    assert!(!opened.get());
    assert!(!dir.path().join("events.json").exists());
}

#[test]
fn test_unknown_docker_image_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(dir.path(), json!({"events": [upwelling_definition()]}));

    let mut options = StageOptions::new(dir.path());
    options.docker = "eawag/delft3d-flow:5.01.00.2163".to_string();
    let err = run_stage_with(&options, |_, _| Ok(Vec::new())).unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Config(_))));
}

#[test]
fn test_verification_failure_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write_properties(dir.path(), json!({"events": [upwelling_definition()]}));

    let mut reader = MemoryReader::new("20240602.nc", vec![0.0, -1.0]);
    for h in 0..3 {
        let t = reader.push_time(hour(h));
        let value = if h == 2 { 45.0 } else { 10.0 + h as f64 };
        let grid = Grid::from_rows(vec![vec![value, 10.0], vec![10.0, 10.0]]).unwrap();
        reader.insert(Field::Temperature, t, 0, grid.clone());
        reader.insert(Field::Temperature, t, 1, grid);
    }

    let mut options = StageOptions::new(dir.path());
    options.verify = true;
    let err = run_stage_with(&options, move |_, _| Ok(vec![Box::new(reader) as Box<dyn FrameReader>]))
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
    assert!(!dir.path().join("events.json").exists());
}

#[test]
fn test_missing_properties_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_stage(&StageOptions::new(dir.path())).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Resource(_))));
}
