//! Ride Viewer - bicycle ride recording viewer
//!
//! Imports a FIT activity, merges its records per timestamp, backfills
//! missing positions, and optionally fuses positions and altitude from a GPX
//! track. The fused samples feed summary, chart and map adapters and can be
//! exported to JSON or CSV.

pub mod activity;
pub mod config;
pub mod export;
pub mod geocode;
pub mod import;
pub mod view;

// Re-export commonly used types
pub use activity::store::{ActivityObserver, ActivityStore};
pub use activity::types::{
    ActivityBundle, FusionError, RawRecord, Sample, SessionSummary, Waypoint,
};
pub use config::ViewerConfig;
pub use import::ImportError;
