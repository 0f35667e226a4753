#![warn(missing_docs)]

//! Sensor blueprints and top-down vehicle control for drift.
//!
//! This crate holds the simulation logic that sits between a physics engine
//! and whatever consumes the vehicle's observations:
//!
//! - compile declarative sensor blueprints into a [`SensorArray`] that
//!   re-casts its rays once per tick,
//! - map throttle/steer onto wheel forces ([`VehicleController`]),
//! - count contacts and remember impacts from collision events
//!   ([`ContactTracker`]).
//!
//! The physics world is reached only through [`WorldProbe`]; rendering only
//! through [`Canvas`].
//!
//! # Example
//!
//! ```ignore
//! use drift_vehicle::{BodyId, Vehicle};
//!
//! let mut car = Vehicle::new(config, &drift_ir::default_blueprints(), BodyId(0))?;
//!
//! // every tick
//! let cmd = car.handle(throttle, steer, rear_wheel_speed);
//! // ... apply `cmd` to the wheels, step the physics world ...
//! car.update_sensors(&probe);
//! let obs = car.sensors().normalized_readings();
//! ```

mod blueprint;
mod contact;
mod controller;
mod error;
mod probe;
mod sensors;
mod vehicle;

#[cfg(test)]
mod testing;

pub use blueprint::{compile, SensorBlueprint, SensorKind};
pub use contact::{ContactKind, ContactTracker, WorldEvent};
pub use controller::{drive_policy, Drive, DriveLimits, VehicleController, WheelCommand};
pub use error::{Result, VehicleError};
pub use probe::{BodyId, Canvas, Segment, SegmentRecorder, WorldProbe};
pub use sensors::{Sensor, SensorArray};
pub use vehicle::{Vehicle, VehicleState};
