//! # Document Loading
//!
//! Reads a file and parses its full contents as a single JSON value.
//! Any JSON value is accepted at the top level (object, array or scalar).

use std::path::Path;

use serde_json::Value;

use crate::validate::SchemaValidationError;

/// Load and parse the JSON document at `path`.
///
/// The file is read to a string in one call, so the handle is closed
/// before parsing starts whether or not the contents are valid JSON.
///
/// # Errors
///
/// Returns `SchemaValidationError::DocumentLoadError` if the file cannot be
/// read (missing, permission denied, not UTF-8) or is not valid JSON.
pub fn load_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SchemaValidationError::DocumentLoadError {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        }
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        SchemaValidationError::DocumentLoadError {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded JSON document");
    Ok(value)
}
