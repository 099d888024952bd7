use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::snapshot::Snapshot;

/// Errors that can occur while loading a [`Snapshot`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input could not be decoded as a snapshot document.
    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),
    /// Document decoded but is not a snapshot object.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// Parse JSON bytes into a [`Snapshot`].
pub fn parse(json: &[u8]) -> Result<Snapshot, ParseError> {
    let value: serde_json::Value = serde_json::from_slice(json)?;
    if !value.is_object() {
        return Err(ParseError::Malformed(
            "top-level value must be an object of tables".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse a JSON snapshot file.
pub fn parse_file(path: &Path) -> Result<Snapshot, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}
