use serde::Serialize;
use thiserror::Error;

/// Errors that abort a whole aggregation run.
#[derive(Debug, Error)]
pub enum ZoningError {
    #[error("required table '{0}' is missing from the snapshot")]
    MissingTable(&'static str),
}

/// Errors that abort the analysis of a single fabric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FabricError {
    #[error("fabric uses LSAN zoning but FC-routing tables are missing: {}", .0.join(", "))]
    MissingRoutingTables(Vec<&'static str>),
}

/// A fabric that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabricFailure {
    pub fabric_name: String,
    pub fabric_label: String,
    pub reason: String,
}

impl FabricFailure {
    pub fn new(fabric_name: &str, fabric_label: &str, err: &FabricError) -> Self {
        Self {
            fabric_name: fabric_name.to_string(),
            fabric_label: fabric_label.to_string(),
            reason: err.to_string(),
        }
    }
}
