//! Session summary panel contents.

use crate::activity::types::ActivityBundle;
use std::fmt;

/// Human-readable duration like "4h 23m", "3m" or "42s".
///
/// Seconds only appear when the duration is under a minute.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;

    let mut parts = Vec::new();
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 || h > 0 {
        parts.push(format!("{}m", m));
    }
    if h == 0 && m == 0 {
        parts.push(format!("{}s", s));
    }
    parts.join(" ")
}

/// Average and maximum of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvgMax {
    pub avg: f64,
    pub max: f64,
}

/// Everything the summary panel shows, already in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub sport: String,
    pub start_town: String,
    pub end_town: String,
    /// Formatted start, empty when unknown
    pub started: String,
    pub duration: String,
    /// km
    pub distance: f64,
    /// meters
    pub ascent: f64,
    /// meters
    pub descent: f64,
    /// km/h
    pub speed: AvgMax,
    /// watts
    pub power: AvgMax,
    /// rpm
    pub cadence: AvgMax,
}

impl SessionReport {
    /// Build the report from the bundle's session and the resolved town names.
    pub fn new(bundle: &ActivityBundle, start_town: &str, end_town: &str) -> Self {
        let session = &bundle.session;
        Self {
            sport: session.sport.clone(),
            start_town: start_town.to_string(),
            end_town: end_town.to_string(),
            started: session
                .started_at()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            duration: format_duration(session.total_elapsed_time),
            distance: session.total_distance,
            ascent: session.total_ascent * 1000.0,
            descent: session.total_descent * 1000.0,
            speed: AvgMax {
                avg: session.avg_speed,
                max: session.max_speed,
            },
            power: AvgMax {
                avg: session.avg_power,
                max: session.max_power,
            },
            cadence: AvgMax {
                avg: session.avg_cadence,
                max: session.max_cadence,
            },
        }
    }

    /// Panel headline.
    pub fn headline(&self) -> String {
        format!("Bike ride from {} to {}", self.start_town, self.end_town)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(f, "Start: {}, Duration {}", self.started, self.duration)?;
        writeln!(f, "Distance: {:.2} km", self.distance)?;
        writeln!(f, "Ascent: {:.2} m", self.ascent)?;
        writeln!(f, "Descent: {:.2} m", self.descent)?;
        writeln!(
            f,
            "Speed: {:.2} km/h (max {:.2})",
            self.speed.avg, self.speed.max
        )?;
        writeln!(f, "Power: {:.2} W (max {:.2})", self.power.avg, self.power.max)?;
        write!(
            f,
            "Cadence: {:.2} rpm (max {:.2})",
            self.cadence.avg, self.cadence.max
        )
    }
}
