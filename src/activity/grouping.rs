//! Collapse raw records that share a timestamp into one sample each.
//!
//! Field conflicts inside a bucket resolve as follows: a value defined on only
//! one side wins, two numeric values resolve to the larger one. The timestamp
//! is the bucket key and therefore identical for every record in a bucket.

use super::types::{RawRecord, Sample};
use std::collections::BTreeMap;

/// Merge two optional readings: defined wins, both defined takes the maximum.
///
/// `f64::max` drops a NaN operand, so a real reading always beats a NaN.
pub fn merge_max(current: Option<f64>, incoming: Option<f64>) -> Option<f64> {
    match (current, incoming) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Merge `incoming` into `acc` field by field.
pub fn merge_record(acc: &mut RawRecord, incoming: &RawRecord) {
    acc.elapsed_time = merge_max(acc.elapsed_time, incoming.elapsed_time);
    acc.timer_time = merge_max(acc.timer_time, incoming.timer_time);
    acc.cadence = merge_max(acc.cadence, incoming.cadence);
    acc.distance = merge_max(acc.distance, incoming.distance);
    acc.speed = merge_max(acc.speed, incoming.speed);
    acc.power = merge_max(acc.power, incoming.power);
    acc.position_lat = merge_max(acc.position_lat, incoming.position_lat);
    acc.position_long = merge_max(acc.position_long, incoming.position_long);
    acc.altitude = merge_max(acc.altitude, incoming.altitude);
}

/// Group records by exact millisecond timestamp, returning samples in
/// ascending time order.
pub fn group_records(records: &[RawRecord]) -> Vec<Sample> {
    let mut buckets: BTreeMap<i64, RawRecord> = BTreeMap::new();

    for record in records {
        buckets
            .entry(record.timestamp.timestamp_millis())
            .and_modify(|acc| merge_record(acc, record))
            .or_insert_with(|| record.clone());
    }

    let origin = buckets.values().next().map(|r| r.timestamp);

    let samples: Vec<Sample> = buckets
        .into_values()
        .map(|merged| {
            let fallback_elapsed = origin
                .map(|start| (merged.timestamp - start).num_milliseconds() as f64 / 1000.0)
                .unwrap_or(0.0);
            let elapsed_time = merged.elapsed_time.unwrap_or(fallback_elapsed);

            Sample {
                timestamp: merged.timestamp,
                elapsed_time,
                timer_time: merged.timer_time.unwrap_or(elapsed_time),
                cadence: merged.cadence.unwrap_or(0.0),
                distance: merged.distance.unwrap_or(0.0),
                speed: merged.speed.unwrap_or(0.0),
                power: merged.power.unwrap_or(0.0),
                position_lat: merged.position_lat,
                position_long: merged.position_long,
                altitude: merged.altitude,
            }
        })
        .collect();

    tracing::debug!(
        "Grouped {} raw records into {} samples",
        records.len(),
        samples.len()
    );

    samples
}
