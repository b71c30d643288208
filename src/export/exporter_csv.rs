//! CSV export of fused samples.

use super::ExportError;
use crate::activity::types::Sample;
use std::io::Write;

/// Column order of the sample table.
pub const CSV_HEADER: &str = "timestamp,position_lat,position_long,distance,speed,power,cadence";

/// Export samples to CSV format.
pub fn export_csv(samples: &[Sample]) -> Result<String, ExportError> {
    if samples.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut output = Vec::new();

    writeln!(output, "{}", CSV_HEADER).map_err(|e| ExportError::WriteFailed(e.to_string()))?;

    for sample in samples {
        writeln!(
            output,
            "{},{},{},{},{},{},{}",
            sample.timestamp.to_rfc3339(),
            sample.position_lat.map_or(String::new(), |v| v.to_string()),
            sample.position_long.map_or(String::new(), |v| v.to_string()),
            sample.distance,
            sample.speed,
            sample.power,
            sample.cadence,
        )
        .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
    }

    String::from_utf8(output).map_err(|e| ExportError::WriteFailed(e.to_string()))
}
