//! FIT activity decoder.
//!
//! Produces raw records plus session and lap summaries in viewer units
//! (km, km/h). Elapsed and timer times are derived from record timestamps
//! and timer start/stop events.

use super::ImportError;
use crate::activity::types::{DecodedLog, LapSummary, RawRecord, SessionSummary};
use chrono::{DateTime, Utc};
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};

/// Semicircles to decimal degrees
const SEMICIRCLE_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// Meters per second to kilometers per hour
const MPS_TO_KMH: f64 = 3.6;

/// Parse FIT file content into raw records and summaries.
pub fn parse_fit(content: &[u8]) -> Result<DecodedLog, ImportError> {
    let fit_data = fitparser::from_bytes(content)
        .map_err(|e| ImportError::FitDecode(e.to_string()))?;

    let mut log = DecodedLog::default();
    let mut timer = TimerTracker::default();
    let mut origin: Option<DateTime<Utc>> = None;

    for message in &fit_data {
        match message.kind() {
            MesgNum::Record => {
                let index = log.records.len();
                let mut record = parse_record(message)
                    .ok_or(ImportError::MissingTimestamp { index })?;

                let start = *origin.get_or_insert(record.timestamp);
                let elapsed = seconds_between(start, record.timestamp);
                record.elapsed_time = Some(elapsed);
                record.timer_time = Some(timer.timer_time(record.timestamp, elapsed));
                log.records.push(record);
            }
            MesgNum::Event => {
                if let Some(start) = origin {
                    timer.observe(message, start);
                }
            }
            MesgNum::Session => log.sessions.push(parse_session(message)),
            MesgNum::Lap => log.laps.push(parse_lap(message)),
            _ => {}
        }
    }

    tracing::debug!(
        "Decoded FIT file: {} records, {} sessions, {} laps",
        log.records.len(),
        log.sessions.len(),
        log.laps.len()
    );

    Ok(log)
}

/// Map one `record` message; `None` when it carries no timestamp.
fn parse_record(message: &FitDataRecord) -> Option<RawRecord> {
    let mut timestamp: Option<DateTime<Utc>> = None;
    let mut record = RawRecord::default();

    for field in message.fields() {
        let value = field.value();
        match field.name() {
            "timestamp" => timestamp = fit_value_to_time(value),
            "position_lat" => {
                record.position_lat = fit_value_to_f64(value)
                    .map(|v| v * SEMICIRCLE_TO_DEGREES)
                    .filter(|lat| lat.abs() <= 90.0);
            }
            "position_long" => {
                record.position_long = fit_value_to_f64(value)
                    .map(|v| v * SEMICIRCLE_TO_DEGREES)
                    .filter(|lon| lon.abs() <= 180.0);
            }
            "altitude" | "enhanced_altitude" => {
                if let Some(m) = fit_value_to_f64(value) {
                    record.altitude = Some(m / 1000.0);
                }
            }
            "distance" => record.distance = fit_value_to_f64(value).map(|m| m / 1000.0),
            "speed" | "enhanced_speed" => {
                if let Some(mps) = fit_value_to_f64(value) {
                    record.speed = Some(mps * MPS_TO_KMH);
                }
            }
            "power" => record.power = fit_value_to_f64(value),
            "cadence" => record.cadence = fit_value_to_f64(value),
            _ => {}
        }
    }

    record.timestamp = timestamp?;
    Some(record)
}

fn parse_session(message: &FitDataRecord) -> SessionSummary {
    let mut session = SessionSummary::default();

    for field in message.fields() {
        let value = field.value();
        let number = fit_value_to_f64(value);
        match field.name() {
            "sport" => session.sport = fit_value_to_string(value),
            "timestamp" => session.timestamp = fit_value_to_time(value),
            "start_time" => session.start_time = fit_value_to_time(value),
            "total_elapsed_time" => session.total_elapsed_time = number.unwrap_or(0.0),
            "total_timer_time" => session.total_timer_time = number.unwrap_or(0.0),
            "total_distance" => session.total_distance = km(number),
            "total_ascent" => session.total_ascent = km(number),
            "total_descent" => session.total_descent = km(number),
            "avg_cadence" => session.avg_cadence = number.unwrap_or(0.0),
            "max_cadence" => session.max_cadence = number.unwrap_or(0.0),
            "avg_power" => session.avg_power = number.unwrap_or(0.0),
            "max_power" => session.max_power = number.unwrap_or(0.0),
            "avg_speed" | "enhanced_avg_speed" => session.avg_speed = kmh(number),
            "max_speed" | "enhanced_max_speed" => session.max_speed = kmh(number),
            _ => {}
        }
    }

    session
}

fn parse_lap(message: &FitDataRecord) -> LapSummary {
    let mut lap = LapSummary::default();

    for field in message.fields() {
        let value = field.value();
        match field.name() {
            "timestamp" => lap.timestamp = fit_value_to_time(value),
            "start_time" => lap.start_time = fit_value_to_time(value),
            "total_elapsed_time" => lap.total_elapsed_time = fit_value_to_f64(value).unwrap_or(0.0),
            "total_timer_time" => lap.total_timer_time = fit_value_to_f64(value).unwrap_or(0.0),
            "total_distance" => lap.total_distance = km(fit_value_to_f64(value)),
            _ => {}
        }
    }

    lap
}

fn km(meters: Option<f64>) -> f64 {
    meters.map_or(0.0, |m| m / 1000.0)
}

fn kmh(mps: Option<f64>) -> f64 {
    mps.map_or(0.0, |v| v * MPS_TO_KMH)
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

/// Accumulates time spent with the timer stopped.
#[derive(Debug, Default)]
struct TimerTracker {
    paused_since: Option<DateTime<Utc>>,
    paused_ms: i64,
}

impl TimerTracker {
    /// Feed an `event` message. Only timer events matter.
    fn observe(&mut self, message: &FitDataRecord, origin: DateTime<Utc>) {
        let mut event = None;
        let mut event_type = None;
        let mut timestamp = None;

        for field in message.fields() {
            match field.name() {
                "event" => event = Some(fit_value_to_string(field.value())),
                "event_type" => event_type = Some(fit_value_to_string(field.value())),
                "timestamp" => timestamp = fit_value_to_time(field.value()),
                _ => {}
            }
        }

        if event.as_deref() != Some("timer") {
            return;
        }
        let (Some(kind), Some(at)) = (event_type, timestamp) else {
            return;
        };
        let at = at.max(origin);

        if kind == "start" {
            self.resume(at);
        } else if kind.starts_with("stop") {
            self.pause(at);
        }
    }

    fn pause(&mut self, at: DateTime<Utc>) {
        if self.paused_since.is_none() {
            self.paused_since = Some(at);
        }
    }

    fn resume(&mut self, at: DateTime<Utc>) {
        if let Some(since) = self.paused_since.take() {
            self.paused_ms += (at - since).num_milliseconds().max(0);
        }
    }

    /// Timer seconds at `at`, given the elapsed seconds at that instant.
    fn timer_time(&self, at: DateTime<Utc>, elapsed: f64) -> f64 {
        let open_pause = self
            .paused_since
            .map_or(0, |since| (at - since).num_milliseconds().max(0));
        (elapsed - (self.paused_ms + open_pause) as f64 / 1000.0).max(0.0)
    }
}

fn fit_value_to_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(t) => Some(t.with_timezone(&Utc)),
        _ => None,
    }
}

fn fit_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fit_value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(v) => Some(*v as f64),
        Value::Float64(v) => Some(*v),
        Value::SInt8(v) => Some(*v as f64),
        Value::UInt8(v) => Some(*v as f64),
        Value::UInt8z(v) => Some(*v as f64),
        Value::Byte(v) => Some(*v as f64),
        Value::SInt16(v) => Some(*v as f64),
        Value::UInt16(v) => Some(*v as f64),
        Value::UInt16z(v) => Some(*v as f64),
        Value::SInt32(v) => Some(*v as f64),
        Value::UInt32(v) => Some(*v as f64),
        Value::UInt32z(v) => Some(*v as f64),
        Value::SInt64(v) => Some(*v as f64),
        Value::UInt64(v) => Some(*v as f64),
        Value::UInt64z(v) => Some(*v as f64),
        Value::Array(values) => values.iter().find_map(fit_value_to_f64),
        _ => None,
    }
}
