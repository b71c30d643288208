//! Unit tests for JSON and CSV export

use chrono::{Duration, TimeZone, Utc};
use ride_viewer::export::exporter_csv::CSV_HEADER;
use ride_viewer::export::{
    export, export_csv, export_json, export_to_path, from_json, generate_filename, ExportError,
    ExportFormat,
};
use ride_viewer::{ActivityBundle, Sample, SessionSummary};

fn bundle() -> ActivityBundle {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 15, 0).unwrap();
    let samples = (0..3)
        .map(|i| {
            let mut s = Sample::new(start + Duration::seconds(i));
            s.elapsed_time = i as f64;
            s.timer_time = i as f64;
            s.distance = i as f64 * 0.01;
            s.speed = 25.0 + i as f64;
            s.power = 180.0;
            s.cadence = 85.0;
            if i > 0 {
                s.position_lat = Some(47.0 + i as f64 * 0.001);
                s.position_long = Some(8.5);
                s.altitude = Some(0.42);
            }
            s
        })
        .collect();

    ActivityBundle {
        session: SessionSummary {
            sport: "cycling".to_string(),
            start_time: Some(start),
            total_distance: 0.02,
            ..Default::default()
        },
        laps: Vec::new(),
        samples,
    }
}

#[test]
fn test_json_round_trip() {
    let original = bundle();
    for pretty in [true, false] {
        let json = export_json(&original, pretty).unwrap();
        let restored = from_json(&json).unwrap();
        assert_eq!(restored, original);
    }
}

#[test]
fn test_json_omits_unknown_position() {
    let json = export_json(&bundle(), false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &value["samples"][0];
    assert!(first.get("position_lat").is_none());
    assert!(value["samples"][1].get("position_lat").is_some());
}

#[test]
fn test_csv_columns() {
    let csv = export_csv(&bundle().samples).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert_eq!(line.split(',').count(), 7);
    }
    // No position on the first sample leaves both columns empty
    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first[1], "");
    assert_eq!(first[2], "");
    assert_eq!(first[5], "180");
}

#[test]
fn test_empty_samples_have_no_data() {
    let mut empty = bundle();
    empty.samples.clear();
    assert!(matches!(
        export(&empty, ExportFormat::Csv, false),
        Err(ExportError::NoData)
    ));
}

#[test]
fn test_from_json_rejects_garbage() {
    assert!(matches!(from_json("{ nope"), Err(ExportError::Json(_))));
}

#[test]
fn test_export_into_directory_uses_generated_name() {
    let dir = tempfile::tempdir().unwrap();
    let written = export_to_path(&bundle(), ExportFormat::Csv, dir.path(), false).unwrap();

    assert_eq!(
        written.file_name().and_then(|n| n.to_str()),
        Some("cycling 2024-06-01 08-15.csv")
    );
    let content = std::fs::read_to_string(&written).unwrap();
    assert!(content.starts_with(CSV_HEADER));
}

#[test]
fn test_export_to_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ride.json");
    let written = export_to_path(&bundle(), ExportFormat::Json, &target, true).unwrap();
    assert_eq!(written, target);
    let restored = from_json(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(restored.samples.len(), 3);
}

#[test]
fn test_filename_falls_back_to_first_sample() {
    let mut b = bundle();
    b.session.start_time = None;
    b.session.timestamp = None;
    assert_eq!(
        generate_filename(&b, ExportFormat::Json),
        "cycling 2024-06-01 08-15.json"
    );
}

#[test]
fn test_json_round_trip_keeps_full_precision() {
    // Device coordinates arrive as semicircles; their degree values and
    // derived speeds use every bit of the mantissa.
    const SEMICIRCLE_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;
    let mut precise = bundle();
    let start = precise.samples[0].timestamp;
    precise.samples = (0..2000i64)
        .map(|i| {
            let mut s = Sample::new(start + Duration::seconds(i));
            s.elapsed_time = i as f64;
            s.timer_time = i as f64;
            s.position_lat = Some((560_000_000 + i * 7919) as f64 * SEMICIRCLE_TO_DEGREES);
            s.position_long = Some((-1_456_340_701 + i * 104_729) as f64 * SEMICIRCLE_TO_DEGREES);
            s.altitude = Some((2477 + i) as f64 / 5.0 / 1000.0 - 0.5);
            s.speed = (8258 + i) as f64 / 1000.0 * 3.6;
            s.distance = i as f64 * 83.0 / 7.0 / 1000.0;
            s.power = 1000.0 / 3.0 + i as f64;
            s
        })
        .collect();

    for pretty in [true, false] {
        let restored = from_json(&export_json(&precise, pretty).unwrap()).unwrap();
        let mismatched = precise
            .samples
            .iter()
            .zip(&restored.samples)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(mismatched, 0);
        assert_eq!(restored, precise);
    }
}
