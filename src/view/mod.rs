//! Presentation adapters over the published bundle.
//!
//! These produce plain data for a chart, a map and a summary panel; drawing
//! is left to whatever front end consumes them.

pub mod chart;
pub mod route;
pub mod summary;

pub use chart::{ChartPoint, ChartSeries};
pub use route::{DetailRow, DistanceWindow, GeoBounds};
pub use summary::{format_duration, SessionReport};
