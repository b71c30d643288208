//! Activity import: FIT and GPX decoding plus the fusion pipeline.
//!
//! A FIT file becomes an [`ActivityBundle`] through decode, grouping and
//! backfill. A GPX file decodes into waypoints that are fused into an
//! existing bundle.

pub mod fit;
pub mod gpx;

use crate::activity::backfill::backfill_positions;
use crate::activity::grouping::group_records;
use crate::activity::types::{ActivityBundle, DecodedLog, FusionError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while importing or fusing activity files
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("FIT decode error: {0}")]
    FitDecode(String),

    #[error("GPX decode error: {0}")]
    GpxDecode(String),

    #[error("FIT record {index} has no timestamp")]
    MissingTimestamp { index: usize },

    #[error("FIT file contains no session")]
    MissingSession,

    #[error("Expected exactly one track, found {found}")]
    TrackCount { found: usize },

    #[error("GPS track has no timestamped points")]
    NoTimedPoints,

    #[error("Import an activity first")]
    NoActivity,

    #[error(transparent)]
    Fusion(#[from] FusionError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Recorded activity
    Fit,
    /// External GPS track
    Gpx,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Fit => write!(f, "FIT"),
            FileFormat::Gpx => write!(f, "GPX"),
        }
    }
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> Result<FileFormat, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ImportError::InvalidFormat("No file extension".to_string()))?;

    match ext.as_str() {
        "fit" => Ok(FileFormat::Fit),
        "gpx" => Ok(FileFormat::Gpx),
        _ => Err(ImportError::InvalidFormat(format!(
            "Unsupported format: {}",
            ext
        ))),
    }
}

/// Read a whole file into memory, mapping a missing file to a clear error.
pub fn read_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

/// Read a file after checking its extension names the expected format.
pub fn read_as(path: &Path, expected: FileFormat) -> Result<Vec<u8>, ImportError> {
    let format = detect_format(path)?;
    if format != expected {
        return Err(ImportError::InvalidFormat(format!(
            "{} is a {} file, expected {}",
            path.display(),
            format,
            expected
        )));
    }
    read_file(path)
}

/// Turn a decoded log into a bundle: group, backfill, attach the first session.
///
/// Any failing stage rejects the whole import.
pub fn build_bundle(log: DecodedLog) -> Result<ActivityBundle, ImportError> {
    let DecodedLog {
        sessions,
        laps,
        records,
    } = log;

    let session = sessions
        .into_iter()
        .next()
        .ok_or(ImportError::MissingSession)?;

    let mut samples = group_records(&records);
    let filled = backfill_positions(&mut samples)?;

    tracing::info!(
        "Built activity bundle: {} samples ({} backfilled), {} laps",
        samples.len(),
        filled,
        laps.len()
    );

    Ok(ActivityBundle {
        session,
        laps,
        samples,
    })
}

/// Decode FIT content and run it through the fusion pipeline.
pub fn import_fit(content: &[u8]) -> Result<ActivityBundle, ImportError> {
    let log = fit::parse_fit(content)?;
    build_bundle(log)
}
