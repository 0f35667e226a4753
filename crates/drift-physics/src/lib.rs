#![warn(missing_docs)]

//! Rapier 2D backend for drift vehicles.
//!
//! This crate puts [`drift_vehicle::Vehicle`] into a top-down physics world:
//! an arena with walls and static obstacles, a box chassis pushed around by
//! a steered front wheel and a driven rear wheel, ray casts for the distance
//! sensors and collision events for contact bookkeeping.
//!
//! # Example
//!
//! ```ignore
//! use drift_physics::{Action, DriveEnv};
//!
//! let scenario = drift_ir::Scenario::from_toml(&text)?;
//! let mut env = DriveEnv::new(scenario)?;
//!
//! loop {
//!     let (obs, done) = env.step(Action { throttle: 1.0, steer: 0.2 });
//!     if done {
//!         break;
//!     }
//! }
//! ```

mod colliders;
mod env;
mod error;
mod events;
mod spawn;
mod wheels;
mod world;

pub use colliders::WALL_THICKNESS;
pub use env::{Action, DriveEnv, Observation, DEFAULT_MAX_STEPS};
pub use error::PhysicsError;
pub use events::body_id;
pub use spawn::{random_pose, spawn_pose};
pub use wheels::{TopDownVehicle, Wheel};
pub use world::{ArenaWorld, ChassisProbe};
