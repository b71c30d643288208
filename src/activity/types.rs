//! Activity data model shared by the fusion pipeline and its consumers.
//!
//! Units follow the viewer's conventions: distance and altitude in kilometers,
//! speed in km/h, power in watts, cadence in RPM, times in seconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One normalized measurement instant of a ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute time of the measurement, unique within a bundle
    pub timestamp: DateTime<Utc>,
    /// Seconds since the activity started
    pub elapsed_time: f64,
    /// Seconds on the timer (pauses excluded)
    pub timer_time: f64,
    /// Cadence in RPM
    pub cadence: f64,
    /// Cumulative distance in kilometers
    pub distance: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Power in watts
    pub power: f64,
    /// Latitude in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_lat: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_long: Option<f64>,
    /// Elevation in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl Sample {
    /// Create an empty sample at the given instant.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            elapsed_time: 0.0,
            timer_time: 0.0,
            cadence: 0.0,
            distance: 0.0,
            speed: 0.0,
            power: 0.0,
            position_lat: None,
            position_long: None,
            altitude: None,
        }
    }

    /// Latitude/longitude pair, if both are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.position_lat, self.position_long) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Check whether this sample carries a full position.
    pub fn has_position(&self) -> bool {
        self.position().is_some()
    }
}

/// A measurement fragment as produced by the binary log decoder.
///
/// Several records may share a timestamp, each carrying a subset of fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub timestamp: DateTime<Utc>,
    pub elapsed_time: Option<f64>,
    pub timer_time: Option<f64>,
    pub cadence: Option<f64>,
    pub distance: Option<f64>,
    pub speed: Option<f64>,
    pub power: Option<f64>,
    pub position_lat: Option<f64>,
    pub position_long: Option<f64>,
    pub altitude: Option<f64>,
}

impl RawRecord {
    /// Create a record carrying only a timestamp.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }
}

/// A timestamped position fix from an external GPS track.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub timestamp: DateTime<Utc>,
    pub position_lat: f64,
    pub position_long: f64,
    /// Elevation in kilometers
    pub altitude: Option<f64>,
}

/// On-device aggregate statistics for one session.
///
/// Read-only for the lifetime of a bundle; never recomputed from samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Sport name as recorded by the device
    pub sport: String,
    /// Time the session message was written
    pub timestamp: Option<DateTime<Utc>>,
    /// Session start
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_elapsed_time: f64,
    #[serde(default)]
    pub total_timer_time: f64,
    /// Kilometers
    #[serde(default)]
    pub total_distance: f64,
    /// Kilometers
    #[serde(default)]
    pub total_ascent: f64,
    /// Kilometers
    #[serde(default)]
    pub total_descent: f64,
    #[serde(default)]
    pub avg_cadence: f64,
    #[serde(default)]
    pub max_cadence: f64,
    #[serde(default)]
    pub avg_power: f64,
    #[serde(default)]
    pub max_power: f64,
    /// km/h
    #[serde(default)]
    pub avg_speed: f64,
    /// km/h
    #[serde(default)]
    pub max_speed: f64,
}

impl Default for SessionSummary {
    fn default() -> Self {
        Self {
            sport: "generic".to_string(),
            timestamp: None,
            start_time: None,
            total_elapsed_time: 0.0,
            total_timer_time: 0.0,
            total_distance: 0.0,
            total_ascent: 0.0,
            total_descent: 0.0,
            avg_cadence: 0.0,
            max_cadence: 0.0,
            avg_power: 0.0,
            max_power: 0.0,
            avg_speed: 0.0,
            max_speed: 0.0,
        }
    }
}

impl SessionSummary {
    /// Best known start of the session.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.or(self.timestamp)
    }
}

/// Lap summary, carried through untouched like the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LapSummary {
    pub timestamp: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_elapsed_time: f64,
    #[serde(default)]
    pub total_timer_time: f64,
    /// Kilometers
    #[serde(default)]
    pub total_distance: f64,
}

/// Everything the binary log decoder hands to the fusion pipeline.
#[derive(Debug, Clone, Default)]
pub struct DecodedLog {
    pub sessions: Vec<SessionSummary>,
    pub laps: Vec<LapSummary>,
    pub records: Vec<RawRecord>,
}

/// The published unit of state: one session and its fused samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBundle {
    pub session: SessionSummary,
    #[serde(default)]
    pub laps: Vec<LapSummary>,
    pub samples: Vec<Sample>,
}

impl ActivityBundle {
    /// First sample of the ride, if any.
    pub fn first_sample(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Last sample of the ride, if any.
    pub fn last_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Number of samples that carry a position.
    pub fn positioned_count(&self) -> usize {
        self.samples.iter().filter(|s| s.has_position()).count()
    }
}

/// Errors raised by the grouping, backfill and alignment stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    /// No sample in the sequence has a position to backfill from
    #[error("no positions found")]
    NoPositionsFound,

    /// The external track has no waypoints
    #[error("GPS track contains no waypoints")]
    EmptyTrack,

    /// Waypoints are not in time order
    #[error("waypoint {index} is earlier than its predecessor")]
    UnsortedWaypoints { index: usize },

    /// Samples are not in time order
    #[error("sample {index} is earlier than its predecessor")]
    UnsortedSamples { index: usize },
}
