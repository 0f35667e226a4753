//! Error types for the physics adapter.

use drift_ir::IrError;
use drift_vehicle::VehicleError;
use thiserror::Error;

/// Errors that can occur while building or driving the simulation.
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Scenario or arena configuration is invalid.
    #[error(transparent)]
    Config(#[from] IrError),

    /// Vehicle could not be built (bad constants or sensor blueprints).
    #[error(transparent)]
    Vehicle(#[from] VehicleError),

    /// Failed to create a collision shape.
    #[error("Failed to create collision shape for {name}: {reason}")]
    CollisionShape {
        /// Obstacle name.
        name: String,
        /// Reason for failure.
        reason: String,
    },
}
