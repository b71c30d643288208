//! Chart series extraction, keyed by distance.

use crate::activity::types::Sample;

/// One plotted point: distance (km) on x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Series shown on the multi-axis ride chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// km/h
    pub speed: Vec<ChartPoint>,
    /// watts
    pub power: Vec<ChartPoint>,
    /// rpm
    pub cadence: Vec<ChartPoint>,
    /// meters, only where altitude is known
    pub altitude: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_samples(samples: &[Sample]) -> Self {
        let series = |value: fn(&Sample) -> f64| -> Vec<ChartPoint> {
            samples
                .iter()
                .map(|s| ChartPoint {
                    x: s.distance,
                    y: value(s),
                })
                .collect()
        };

        Self {
            speed: series(|s| s.speed),
            power: series(|s| s.power),
            cadence: series(|s| s.cadence),
            altitude: samples
                .iter()
                .filter_map(|s| {
                    s.altitude.map(|km| ChartPoint {
                        x: s.distance,
                        y: km * 1000.0,
                    })
                })
                .collect(),
        }
    }

    /// Distance range covered by the chart, for the initial zoom.
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        let first = self.speed.first()?.x;
        let last = self.speed.last()?.x;
        Some((first, last))
    }
}
