//! Unit tests for the GPX track decoder

use chrono::{TimeZone, Utc};
use ride_viewer::import::gpx::parse_gpx;
use ride_viewer::ImportError;

fn gpx_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
{}
</gpx>"#,
        body
    )
}

const ONE_TRACK: &str = r#"
  <trk>
    <name>Lake Loop</name>
    <trkseg>
      <trkpt lat="47.1" lon="8.1"><ele>100</ele><time>2024-06-01T10:00:00Z</time></trkpt>
      <trkpt lat="47.2" lon="8.2"><ele>150</ele><time>2024-06-01T10:00:10Z</time></trkpt>
    </trkseg>
  </trk>"#;

#[test]
fn test_parse_single_track() {
    let waypoints = parse_gpx(gpx_document(ONE_TRACK).as_bytes()).unwrap();

    assert_eq!(waypoints.len(), 2);
    assert_eq!(
        waypoints[0].timestamp,
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    );
    assert!((waypoints[0].position_lat - 47.1).abs() < 1e-9);
    assert!((waypoints[0].position_long - 8.1).abs() < 1e-9);
}

#[test]
fn test_elevation_converted_to_kilometers() {
    let waypoints = parse_gpx(gpx_document(ONE_TRACK).as_bytes()).unwrap();
    assert!((waypoints[0].altitude.unwrap() - 0.1).abs() < 1e-9);
    assert!((waypoints[1].altitude.unwrap() - 0.15).abs() < 1e-9);
}

#[test]
fn test_missing_elevation_is_none() {
    let body = r#"
  <trk><trkseg>
    <trkpt lat="47.1" lon="8.1"><time>2024-06-01T10:00:00Z</time></trkpt>
  </trkseg></trk>"#;
    let waypoints = parse_gpx(gpx_document(body).as_bytes()).unwrap();
    assert_eq!(waypoints[0].altitude, None);
}

#[test]
fn test_zero_tracks_rejected() {
    let result = parse_gpx(gpx_document("").as_bytes());
    assert!(matches!(result, Err(ImportError::TrackCount { found: 0 })));
}

#[test]
fn test_two_tracks_rejected() {
    let body = format!("{}{}", ONE_TRACK, ONE_TRACK);
    let result = parse_gpx(gpx_document(&body).as_bytes());
    assert!(matches!(result, Err(ImportError::TrackCount { found: 2 })));
}

#[test]
fn test_segments_are_concatenated() {
    let body = r#"
  <trk>
    <trkseg>
      <trkpt lat="47.1" lon="8.1"><time>2024-06-01T10:00:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="47.2" lon="8.2"><time>2024-06-01T10:05:00Z</time></trkpt>
      <trkpt lat="47.3" lon="8.3"><time>2024-06-01T10:05:10Z</time></trkpt>
    </trkseg>
  </trk>"#;
    let waypoints = parse_gpx(gpx_document(body).as_bytes()).unwrap();
    assert_eq!(waypoints.len(), 3);
}

#[test]
fn test_untimed_points_are_skipped() {
    let body = r#"
  <trk><trkseg>
    <trkpt lat="47.1" lon="8.1"><time>2024-06-01T10:00:00Z</time></trkpt>
    <trkpt lat="47.15" lon="8.15"></trkpt>
    <trkpt lat="47.2" lon="8.2"><time>2024-06-01T10:00:10Z</time></trkpt>
  </trkseg></trk>"#;
    let waypoints = parse_gpx(gpx_document(body).as_bytes()).unwrap();
    assert_eq!(waypoints.len(), 2);
}

#[test]
fn test_track_without_any_time_rejected() {
    let body = r#"
  <trk><trkseg>
    <trkpt lat="47.1" lon="8.1"></trkpt>
  </trkseg></trk>"#;
    let result = parse_gpx(gpx_document(body).as_bytes());
    assert!(matches!(result, Err(ImportError::NoTimedPoints)));
}

#[test]
fn test_out_of_order_points_are_sorted() {
    let body = r#"
  <trk><trkseg>
    <trkpt lat="47.2" lon="8.2"><time>2024-06-01T10:00:10Z</time></trkpt>
    <trkpt lat="47.1" lon="8.1"><time>2024-06-01T10:00:00Z</time></trkpt>
  </trkseg></trk>"#;
    let waypoints = parse_gpx(gpx_document(body).as_bytes()).unwrap();
    assert!(waypoints[0].timestamp < waypoints[1].timestamp);
    assert!((waypoints[0].position_lat - 47.1).abs() < 1e-9);
}

#[test]
fn test_invalid_xml_rejected() {
    let result = parse_gpx(b"<gpx><trk>");
    assert!(matches!(result, Err(ImportError::GpxDecode(_))));
}

#[test]
fn test_invalid_utf8_rejected() {
    let result = parse_gpx(&[0xff, 0xfe, 0xfd]);
    assert!(matches!(result, Err(ImportError::GpxDecode(_))));
}
