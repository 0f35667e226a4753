//! Throttle/steer to wheel actuation.
//!
//! The rear wheel drives and brakes, the front wheel steers. Reverse throttle
//! brakes while the car still rolls forward and drives backwards once it has
//! (nearly) stopped; the choice is recomputed from the rear wheel speed on
//! every call, nothing is remembered between ticks.

use drift_ir::VehicleConfig;
use serde::{Deserialize, Serialize};

/// Ratio between the front wheel steer angle and the rotation drawn on the
/// wheel sprites.
const WHEEL_SPRITE_RATIO: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Force caps that shape the drive policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveLimits {
    /// Steering lock in radians.
    pub max_steer: f64,
    /// Forward drive force at full throttle.
    pub max_engine_force: f64,
    /// Brake force at full reverse throttle.
    pub max_brake_force: f64,
    /// Reverse drive force at full reverse throttle.
    pub max_backward_force: f64,
    /// Rear wheel speed above which reverse throttle brakes.
    pub reverse_speed_threshold: f64,
}

impl From<&VehicleConfig> for DriveLimits {
    fn from(config: &VehicleConfig) -> Self {
        Self {
            max_steer: config.max_steer,
            max_engine_force: config.max_engine_force,
            max_brake_force: config.max_brake_force,
            max_backward_force: config.max_backward_force,
            reverse_speed_threshold: config.reverse_speed_threshold,
        }
    }
}

/// Longitudinal forces for the rear wheel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Drive {
    /// Engine force along the wheel axis; negative drives backwards.
    pub engine_force: f64,
    /// Brake force magnitude.
    pub brake_force: f64,
}

/// Pick brake vs. drive for a throttle command.
///
/// Braking and driving never overlap: whenever a brake force is applied the
/// engine force is zero.
pub fn drive_policy(throttle: f64, rear_wheel_speed: f64, limits: &DriveLimits) -> Drive {
    let force = throttle * limits.max_engine_force;

    if force < 0.0 {
        if rear_wheel_speed > limits.reverse_speed_threshold {
            Drive {
                engine_force: 0.0,
                brake_force: -throttle * limits.max_brake_force,
            }
        } else {
            Drive {
                engine_force: throttle * limits.max_backward_force,
                brake_force: 0.0,
            }
        }
    } else {
        Drive {
            engine_force: force,
            brake_force: 0.0,
        }
    }
}

/// Per-wheel actuation for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelCommand {
    /// Front wheel steer angle in radians; positive is left.
    pub steer_value: f64,
    /// Rear wheel engine force.
    pub engine_force: f64,
    /// Rear wheel brake force.
    pub brake_force: f64,
}

/// Maps commanded inputs onto wheel actuation.
#[derive(Debug, Clone)]
pub struct VehicleController {
    limits: DriveLimits,
    command: WheelCommand,
}

impl VehicleController {
    /// Create a controller with the given caps.
    pub fn new(limits: DriveLimits) -> Self {
        Self {
            limits,
            command: WheelCommand::default(),
        }
    }

    /// Compute actuation for `throttle` and `steer`.
    ///
    /// Inputs are expected in `[-1, 1]` but are not clamped; values outside
    /// that range scale the forces proportionally.
    pub fn handle(&mut self, throttle: f64, steer: f64, rear_wheel_speed: f64) -> WheelCommand {
        let drive = drive_policy(throttle, rear_wheel_speed, &self.limits);

        self.command = WheelCommand {
            steer_value: self.limits.max_steer * steer,
            engine_force: drive.engine_force,
            brake_force: drive.brake_force,
        };
        self.command
    }

    /// Actuation from the last [`handle`](Self::handle) call.
    pub fn command(&self) -> WheelCommand {
        self.command
    }

    /// The caps this controller was built with.
    pub fn limits(&self) -> &DriveLimits {
        &self.limits
    }

    /// Rotation the renderer applies to the front wheel sprites.
    pub fn front_wheel_visual_angle(&self) -> f64 {
        self.command.steer_value * WHEEL_SPRITE_RATIO
    }
}
