//! Integration tests for the decode, group, backfill and fuse pipeline

use chrono::{DateTime, TimeZone, Utc};
use ride_viewer::activity::align_waypoints;
use ride_viewer::activity::types::{DecodedLog, LapSummary};
use ride_viewer::export::{export_csv, export_json, from_json};
use ride_viewer::import::build_bundle;
use ride_viewer::import::gpx::parse_gpx;
use ride_viewer::{FusionError, ImportError, RawRecord, SessionSummary};

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, h, m, s).unwrap()
}

fn session() -> SessionSummary {
    SessionSummary {
        sport: "cycling".to_string(),
        start_time: Some(at(10, 0, 0)),
        total_elapsed_time: 1.0,
        max_power: 110.0,
        ..Default::default()
    }
}

fn recorded_log() -> DecodedLog {
    DecodedLog {
        sessions: vec![session()],
        laps: vec![LapSummary {
            start_time: Some(at(10, 0, 0)),
            ..Default::default()
        }],
        records: vec![
            RawRecord {
                power: Some(100.0),
                ..RawRecord::new(at(10, 0, 0))
            },
            RawRecord {
                cadence: Some(80.0),
                ..RawRecord::new(at(10, 0, 0))
            },
            RawRecord {
                power: Some(110.0),
                position_lat: Some(1.0),
                position_long: Some(2.0),
                ..RawRecord::new(at(10, 0, 1))
            },
        ],
    }
}

#[test]
fn test_records_grouped_and_backfilled() {
    let bundle = build_bundle(recorded_log()).unwrap();

    assert_eq!(bundle.samples.len(), 2);
    let first = &bundle.samples[0];
    assert_eq!(first.power, 100.0);
    assert_eq!(first.cadence, 80.0);
    assert_eq!(first.position(), Some((1.0, 2.0)));
    assert_eq!(first.elapsed_time, 0.0);

    let second = &bundle.samples[1];
    assert_eq!(second.power, 110.0);
    assert_eq!(second.elapsed_time, 1.0);
    assert_eq!(bundle.positioned_count(), 2);
}

#[test]
fn test_session_and_laps_pass_through() {
    let bundle = build_bundle(recorded_log()).unwrap();
    assert_eq!(bundle.session, session());
    assert_eq!(bundle.laps.len(), 1);
}

#[test]
fn test_only_first_session_is_kept() {
    let mut log = recorded_log();
    let mut second = session();
    second.sport = "running".to_string();
    log.sessions.push(second);

    let bundle = build_bundle(log).unwrap();
    assert_eq!(bundle.session.sport, "cycling");
}

#[test]
fn test_missing_session_rejected() {
    let mut log = recorded_log();
    log.sessions.clear();
    assert!(matches!(build_bundle(log), Err(ImportError::MissingSession)));
}

#[test]
fn test_no_positions_aborts_import() {
    let mut log = recorded_log();
    for record in &mut log.records {
        record.position_lat = None;
        record.position_long = None;
    }
    let result = build_bundle(log);
    assert!(matches!(
        result,
        Err(ImportError::Fusion(FusionError::NoPositionsFound))
    ));
}

#[test]
fn test_gpx_replaces_positions_after_backfill() {
    let mut bundle = build_bundle(recorded_log()).unwrap();
    let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><trkseg>
    <trkpt lat="47.0" lon="8.0"><ele>420</ele><time>2024-06-01T09:59:59Z</time></trkpt>
    <trkpt lat="47.1" lon="8.1"><ele>430</ele><time>2024-06-01T10:00:02Z</time></trkpt>
  </trkseg></trk>
</gpx>"#;
    let waypoints = parse_gpx(gpx.as_bytes()).unwrap();

    let stats = align_waypoints(&mut bundle.samples, &waypoints).unwrap();

    assert_eq!(stats.samples, 2);
    assert_eq!(bundle.samples[0].position(), Some((47.0, 8.0)));
    assert_eq!(bundle.samples[1].position(), Some((47.1, 8.1)));
    assert!((bundle.samples[1].altitude.unwrap() - 0.43).abs() < 1e-9);
    assert_eq!(bundle.samples[1].power, 110.0);
}

#[test]
fn test_fused_bundle_exports() {
    let bundle = build_bundle(recorded_log()).unwrap();

    let csv = export_csv(&bundle.samples).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let restored = from_json(&export_json(&bundle, true).unwrap()).unwrap();
    assert_eq!(restored, bundle);
}
