//! Map-side helpers: route polyline, nearest point and distance windows.
//!
//! A chart zoom or pan yields a distance window; the map highlights the
//! samples inside it. A click on the route yields a window around the
//! nearest sample.

use crate::activity::types::Sample;

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Bounds of a set of coordinates; `None` when empty.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(lat, lon), rest) = points.split_first()?;
        let start = GeoBounds {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        };
        Some(rest.iter().fold(start, |b, &(lat, lon)| GeoBounds {
            min_lat: b.min_lat.min(lat),
            max_lat: b.max_lat.max(lat),
            min_lon: b.min_lon.min(lon),
            max_lon: b.max_lon.max(lon),
        }))
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// An inclusive distance range in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceWindow {
    pub min: f64,
    pub max: f64,
}

impl DistanceWindow {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Window of `half_width` km on each side of `distance`.
    pub fn around(distance: f64, half_width: f64) -> Self {
        Self::new(distance - half_width, distance + half_width)
    }

    /// The whole ride, as used by the "center map" control.
    pub fn full(total_distance: f64) -> Self {
        Self::new(0.0, total_distance)
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.min && distance <= self.max
    }
}

/// Calculate horizontal distance between two GPS points (Haversine formula)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS: f64 = 6_371_000.0; // meters

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS * c
}

/// Coordinates of every positioned sample, in order.
pub fn route_line(samples: &[Sample]) -> Vec<(f64, f64)> {
    samples.iter().filter_map(Sample::position).collect()
}

/// The positioned sample closest to a coordinate on the map.
pub fn nearest_sample(samples: &[Sample], lat: f64, lon: f64) -> Option<&Sample> {
    samples
        .iter()
        .filter_map(|s| {
            s.position()
                .map(|(slat, slon)| (s, haversine_distance(lat, lon, slat, slon)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}

/// Samples whose distance lies inside the window.
pub fn select_by_distance(samples: &[Sample], window: DistanceWindow) -> Vec<&Sample> {
    samples
        .iter()
        .filter(|s| window.contains(s.distance))
        .collect()
}

/// Highlight polyline for a window.
pub fn highlight_line(samples: &[Sample], window: DistanceWindow) -> Vec<(f64, f64)> {
    select_by_distance(samples, window)
        .into_iter()
        .filter_map(Sample::position)
        .collect()
}

/// Window to zoom to after a click on the route.
pub fn window_for_click(
    samples: &[Sample],
    lat: f64,
    lon: f64,
    half_width_km: f64,
) -> Option<DistanceWindow> {
    nearest_sample(samples, lat, lon).map(|s| DistanceWindow::around(s.distance, half_width_km))
}

/// One labelled row of the hover popup, e.g. `Speed` / `27.41 km/h`.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

fn detail_value(value: f64, unit: &str) -> String {
    // zero is printed without decimals
    if value == 0.0 {
        format!("0 {}", unit)
    } else {
        format!("{:.2} {}", value, unit)
    }
}

/// Rows shown when hovering a sample on the route.
///
/// Altitude is given in meters and omitted when unknown.
pub fn sample_details(sample: &Sample) -> Vec<DetailRow> {
    let mut rows = vec![DetailRow {
        label: "Time",
        value: sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
    }];
    if let Some(km) = sample.altitude {
        rows.push(DetailRow {
            label: "Altitude",
            value: detail_value(km * 1000.0, "m"),
        });
    }
    for (label, value, unit) in [
        ("Distance", sample.distance, "km"),
        ("Speed", sample.speed, "km/h"),
        ("Power", sample.power, "W"),
        ("Cadence", sample.cadence, "rpm"),
    ] {
        rows.push(DetailRow {
            label,
            value: detail_value(value, unit),
        });
    }
    rows
}

/// Popup rows for the sample nearest to the hovered coordinate.
pub fn hover_details(samples: &[Sample], lat: f64, lon: f64) -> Option<Vec<DetailRow>> {
    nearest_sample(samples, lat, lon).map(sample_details)
}
