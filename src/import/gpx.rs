//! GPX track decoder for position fusion.

use super::ImportError;
use crate::activity::types::Waypoint;
use chrono::{DateTime, Utc};

/// Convert gpx Time to chrono DateTime
fn gpx_time_to_chrono(time: gpx::Time) -> Option<DateTime<Utc>> {
    // gpx::Time wraps time::OffsetDateTime, convert via string format
    let formatted = time.format().ok()?;
    DateTime::parse_from_rfc3339(&formatted)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse GPX content into time-ordered waypoints.
///
/// The file must hold exactly one track. Segments are concatenated, points
/// without a time are skipped, and elevation is converted to kilometers.
pub fn parse_gpx(content: &[u8]) -> Result<Vec<Waypoint>, ImportError> {
    let content_str = std::str::from_utf8(content)
        .map_err(|e| ImportError::GpxDecode(format!("Invalid UTF-8: {}", e)))?;

    let gpx_data: gpx::Gpx = gpx::read(content_str.as_bytes())
        .map_err(|e| ImportError::GpxDecode(e.to_string()))?;

    if gpx_data.tracks.len() != 1 {
        return Err(ImportError::TrackCount {
            found: gpx_data.tracks.len(),
        });
    }

    let mut waypoints = Vec::new();
    let mut untimed = 0;

    for track in gpx_data.tracks {
        for segment in track.segments {
            for point in segment.points {
                let geo = point.point();
                let Some(timestamp) = point.time.and_then(gpx_time_to_chrono) else {
                    untimed += 1;
                    continue;
                };
                waypoints.push(Waypoint {
                    timestamp,
                    position_lat: geo.y(),
                    position_long: geo.x(),
                    altitude: point.elevation.map(|m| m / 1000.0),
                });
            }
        }
    }

    if untimed > 0 {
        tracing::warn!("Skipped {} track points without a timestamp", untimed);
    }

    if waypoints.is_empty() {
        return Err(ImportError::NoTimedPoints);
    }

    if waypoints
        .windows(2)
        .any(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        tracing::warn!("Track points out of time order, sorting");
        waypoints.sort_by_key(|w| w.timestamp);
    }

    tracing::debug!("Decoded GPX track with {} waypoints", waypoints.len());

    Ok(waypoints)
}
