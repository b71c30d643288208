//! Activity model and the record fusion engine.
//!
//! Raw decoder records are grouped per timestamp, gaps in position are
//! backfilled, and an optional external GPS track is aligned onto the result.

pub mod alignment;
pub mod backfill;
pub mod grouping;
pub mod store;
pub mod types;

pub use alignment::{align_waypoints, AlignmentStats};
pub use backfill::backfill_positions;
pub use grouping::group_records;
pub use store::{ActivityObserver, ActivityStore};
pub use types::{
    ActivityBundle, DecodedLog, FusionError, LapSummary, RawRecord, Sample, SessionSummary,
    Waypoint,
};
