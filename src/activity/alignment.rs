//! Align an external GPS track against the sample sequence.
//!
//! Both sequences must be in time order. A cursor walks the waypoints and
//! only ever moves forward, so alignment is linear in the combined length.

use super::types::{FusionError, Sample, Waypoint};
use chrono::{DateTime, Utc};

/// Outcome of a fusion pass, for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentStats {
    /// Samples whose position and altitude were overwritten
    pub samples: usize,
    /// Waypoints offered by the track
    pub waypoints: usize,
    /// Largest time distance between a sample and its chosen waypoint, in seconds
    pub max_offset_secs: f64,
}

fn millis_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a - b).num_milliseconds().abs()
}

fn check_order<T>(
    items: &[T],
    time: impl Fn(&T) -> DateTime<Utc>,
) -> Result<(), usize> {
    match items
        .windows(2)
        .position(|pair| time(&pair[1]) < time(&pair[0]))
    {
        Some(i) => Err(i + 1),
        None => Ok(()),
    }
}

/// For each sample time, the index of the nearest waypoint.
///
/// The cursor advances while the next waypoint is strictly closer than the
/// current one, so equal distances keep the earlier waypoint. The returned
/// indices never decrease.
pub fn nearest_waypoint_indices(
    sample_times: &[DateTime<Utc>],
    waypoints: &[Waypoint],
) -> Vec<usize> {
    let mut cursor = 0;
    sample_times
        .iter()
        .map(|&time| {
            while cursor + 1 < waypoints.len()
                && millis_between(waypoints[cursor + 1].timestamp, time)
                    < millis_between(waypoints[cursor].timestamp, time)
            {
                cursor += 1;
            }
            cursor
        })
        .collect()
}

/// Overwrite position and altitude of every sample with the nearest waypoint.
///
/// The waypoint track is authoritative: a waypoint without altitude clears
/// the sample's altitude. All preconditions are checked before any sample is
/// touched, so a failed call leaves `samples` unchanged.
pub fn align_waypoints(
    samples: &mut [Sample],
    waypoints: &[Waypoint],
) -> Result<AlignmentStats, FusionError> {
    if waypoints.is_empty() {
        return Err(FusionError::EmptyTrack);
    }
    check_order(waypoints, |w| w.timestamp)
        .map_err(|index| FusionError::UnsortedWaypoints { index })?;
    check_order(&*samples, |s| s.timestamp)
        .map_err(|index| FusionError::UnsortedSamples { index })?;

    let times: Vec<DateTime<Utc>> = samples.iter().map(|s| s.timestamp).collect();
    let indices = nearest_waypoint_indices(&times, waypoints);

    let mut max_offset_ms: i64 = 0;
    for (sample, &index) in samples.iter_mut().zip(indices.iter()) {
        let waypoint = &waypoints[index];
        max_offset_ms = max_offset_ms.max(millis_between(waypoint.timestamp, sample.timestamp));

        sample.position_lat = Some(waypoint.position_lat);
        sample.position_long = Some(waypoint.position_long);
        sample.altitude = waypoint.altitude;
    }

    let stats = AlignmentStats {
        samples: samples.len(),
        waypoints: waypoints.len(),
        max_offset_secs: max_offset_ms as f64 / 1000.0,
    };

    tracing::debug!(
        "Aligned {} samples against {} waypoints (max offset {:.1}s)",
        stats.samples,
        stats.waypoints,
        stats.max_offset_secs
    );

    Ok(stats)
}
