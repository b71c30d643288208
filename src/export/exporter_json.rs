//! JSON export of the whole bundle.

use super::ExportError;
use crate::activity::types::ActivityBundle;

/// Serialize the bundle (session, laps and samples) to JSON.
pub fn export_json(bundle: &ActivityBundle, pretty: bool) -> Result<String, ExportError> {
    let content = if pretty {
        serde_json::to_string_pretty(bundle)?
    } else {
        serde_json::to_string(bundle)?
    };
    Ok(content)
}

/// Parse a bundle previously written by [`export_json`].
pub fn from_json(content: &str) -> Result<ActivityBundle, ExportError> {
    Ok(serde_json::from_str(content)?)
}
