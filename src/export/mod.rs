//! Export of the published bundle to JSON and CSV.

pub mod exporter_csv;
pub mod exporter_json;

use crate::activity::types::ActivityBundle;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use exporter_csv::export_csv;
pub use exporter_json::{export_json, from_json};

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Whole bundle as JSON
    Json,
    /// Fixed-column sample table
    Csv,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Errors during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No samples to export
    #[error("Activity has no data to export")]
    NoData,

    /// Failed to write export data
    #[error("Failed to write data: {0}")]
    WriteFailed(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Serialize the bundle in the requested format.
pub fn export(
    bundle: &ActivityBundle,
    format: ExportFormat,
    pretty: bool,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => export_json(bundle, pretty),
        ExportFormat::Csv => export_csv(&bundle.samples),
    }
}

/// Generate a default filename: sport, session start and extension.
pub fn generate_filename(bundle: &ActivityBundle, format: ExportFormat) -> String {
    let started = bundle
        .session
        .started_at()
        .or_else(|| bundle.first_sample().map(|s| s.timestamp))
        .map(|t| t.format("%Y-%m-%d %H-%M").to_string())
        .unwrap_or_else(|| "undated".to_string());

    format!("{} {}.{}", bundle.session.sport, started, format.extension())
}

/// Resolve an output path: directories receive the generated filename.
pub fn resolve_output_path(
    bundle: &ActivityBundle,
    format: ExportFormat,
    target: &Path,
) -> PathBuf {
    if target.is_dir() {
        target.join(generate_filename(bundle, format))
    } else {
        target.to_path_buf()
    }
}

/// Export the bundle and write it to `target` (a file or a directory).
pub fn export_to_path(
    bundle: &ActivityBundle,
    format: ExportFormat,
    target: &Path,
    pretty: bool,
) -> Result<PathBuf, ExportError> {
    let content = export(bundle, format, pretty)?;
    let path = resolve_output_path(bundle, format, target);
    std::fs::write(&path, content)?;

    tracing::info!("Exported {} to {}", format, path.display());
    Ok(path)
}
