//! Error types for vehicle construction.

use drift_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building a vehicle.
#[derive(Error, Debug)]
pub enum VehicleError {
    /// A blueprint names a sensor kind that does not exist.
    #[error("sensor #{index}: unknown sensor kind {kind:?}")]
    UnknownSensorKind {
        /// Position of the offending blueprint.
        index: usize,
        /// The kind string as configured.
        kind: String,
    },

    /// A distance blueprint is missing a required field.
    #[error("sensor #{index}: distance sensor requires `{field}`")]
    MissingField {
        /// Position of the offending blueprint.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A blueprint value is out of range.
    #[error("sensor #{index}: {reason}")]
    InvalidBlueprint {
        /// Position of the offending blueprint.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Vehicle constants failed validation.
    #[error(transparent)]
    Config(#[from] IrError),
}

/// Result type for vehicle operations.
pub type Result<T> = std::result::Result<T, VehicleError>;
