#![warn(missing_docs)]

//! Declarative configuration for the drift vehicle simulator.
//!
//! Everything here is plain data: sensor blueprints as written in a scenario
//! file, per-vehicle constants, the arena layout and a scripted command
//! sequence. Turning blueprints into live sensors happens in `drift-vehicle`;
//! building the physics world happens in `drift-physics`.

mod error;
mod preset;

pub use error::{IrError, Result};
pub use preset::default_blueprints;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A sensor descriptor as it appears in configuration.
///
/// `kind` is kept as a string so an unknown kind survives parsing and is
/// reported by the blueprint compiler, before any sensor exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintSpec {
    /// Sensor kind: `"distance"` or `"speed"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ray angle in degrees from the vehicle forward axis (counter-clockwise).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Maximum ray length in world units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Ray origin in the vehicle-local frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<[f64; 2]>,
}

impl BlueprintSpec {
    /// A distance sensor descriptor.
    pub fn distance(angle: f64, length: f64, start: [f64; 2]) -> Self {
        Self {
            kind: "distance".to_string(),
            angle: Some(angle),
            length: Some(length),
            start: Some(start),
        }
    }

    /// A speed sensor descriptor.
    pub fn speed() -> Self {
        Self {
            kind: "speed".to_string(),
            angle: None,
            length: None,
            start: None,
        }
    }
}

/// One wheel of the two-wheel vehicle model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Attachment point in the vehicle-local frame.
    pub position: [f64; 2],
    /// Maximum lateral friction force.
    pub side_friction: f64,
}

/// Per-vehicle constants, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Steering lock in radians.
    pub max_steer: f64,
    /// Forward drive force at full throttle.
    pub max_engine_force: f64,
    /// Brake force at full reverse throttle while rolling forward.
    pub max_brake_force: f64,
    /// Reverse drive force at full reverse throttle.
    pub max_backward_force: f64,
    /// Rear wheel speed above which reverse throttle brakes instead of
    /// reversing.
    pub reverse_speed_threshold: f64,
    /// Chassis linear damping.
    pub linear_damping: f64,
    /// Chassis angular damping.
    pub angular_damping: f64,
    /// Chassis mass.
    pub mass: f64,
    /// Chassis `[width, length]`.
    pub chassis_size: [f64; 2],
    /// Steered wheel.
    pub front_wheel: WheelConfig,
    /// Driven and braked wheel.
    pub rear_wheel: WheelConfig,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_steer: PI / 7.0,
            max_engine_force: 10.0,
            max_brake_force: 5.0,
            max_backward_force: 2.0,
            reverse_speed_threshold: 0.1,
            linear_damping: 0.5,
            angular_damping: 0.3,
            mass: 1.0,
            chassis_size: [0.5, 1.0],
            front_wheel: WheelConfig {
                position: [0.0, 0.5],
                side_friction: 50.0,
            },
            // Less grip at the back makes the car easier to drift.
            rear_wheel: WheelConfig {
                position: [0.0, -0.5],
                side_friction: 45.0,
            },
        }
    }
}

impl VehicleConfig {
    /// Validate the constants.
    pub fn validate(&self) -> Result<()> {
        let caps = [
            ("max_steer", self.max_steer),
            ("max_engine_force", self.max_engine_force),
            ("max_brake_force", self.max_brake_force),
            ("max_backward_force", self.max_backward_force),
            ("reverse_speed_threshold", self.reverse_speed_threshold),
            ("linear_damping", self.linear_damping),
            ("angular_damping", self.angular_damping),
            ("front_wheel.side_friction", self.front_wheel.side_friction),
            ("rear_wheel.side_friction", self.rear_wheel.side_friction),
        ];
        for (name, value) in caps {
            if !value.is_finite() || value < 0.0 {
                return Err(IrError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.mass > 0.0) || !self.mass.is_finite() {
            return Err(IrError::InvalidConfig("mass must be positive".into()));
        }
        if self.chassis_size.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
            return Err(IrError::InvalidConfig(
                "chassis_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// A static obstacle placed in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Obstacle {
    /// Rectangle centered at `center`.
    Box {
        /// Center in world coordinates.
        center: [f64; 2],
        /// Full `[width, height]`.
        size: [f64; 2],
        /// Rotation in degrees.
        #[serde(default)]
        angle: f64,
    },
    /// Disc centered at `center`.
    Ball {
        /// Center in world coordinates.
        center: [f64; 2],
        /// Radius.
        radius: f64,
    },
}

/// The world the vehicle drives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width, centered on the origin.
    pub width: f64,
    /// Arena height, centered on the origin.
    pub height: f64,
    /// Enclose the arena with static walls.
    pub walls: bool,
    /// Contact force above which a collision counts as an impact.
    pub impact_force_threshold: f64,
    /// Static obstacles.
    pub obstacles: Vec<Obstacle>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            walls: true,
            impact_force_threshold: 1.0,
            obstacles: Vec::new(),
        }
    }
}

/// Where the vehicle starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Spawn {
    /// Uniformly random position inside the arena and random heading.
    Random {
        /// RNG seed, so runs are reproducible.
        seed: u64,
    },
    /// Explicit pose.
    Fixed {
        /// World position.
        position: [f64; 2],
        /// Heading in degrees.
        #[serde(default)]
        heading: f64,
    },
}

impl Default for Spawn {
    fn default() -> Self {
        Spawn::Random { seed: 0 }
    }
}

/// A held control input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Number of ticks to hold the input.
    pub ticks: u32,
    /// Throttle in `[-1, 1]`.
    #[serde(default)]
    pub throttle: f64,
    /// Steer in `[-1, 1]`, positive is left.
    #[serde(default)]
    pub steer: f64,
    /// Flip overlay visibility on the first tick of this command.
    #[serde(default)]
    pub toggle_overlay: bool,
}

/// A complete, scripted simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Fixed timestep in seconds.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Vehicle constants.
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Sensor blueprints, in declaration order.
    #[serde(default = "default_blueprints")]
    pub sensors: Vec<BlueprintSpec>,
    /// Arena layout.
    #[serde(default)]
    pub arena: ArenaConfig,
    /// Start pose.
    #[serde(default)]
    pub spawn: Spawn,
    /// Scripted inputs, played in order.
    #[serde(default)]
    pub commands: Vec<Command>,
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            vehicle: VehicleConfig::default(),
            sensors: default_blueprints(),
            arena: ArenaConfig::default(),
            spawn: Spawn::default(),
            commands: Vec::new(),
        }
    }
}

impl Scenario {
    /// Total number of scripted ticks.
    pub fn total_ticks(&self) -> u64 {
        self.commands.iter().map(|c| u64::from(c.ticks)).sum()
    }

    /// Check numeric ranges that parsing cannot catch.
    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(IrError::InvalidConfig("dt must be positive".into()));
        }
        if !(self.arena.width > 0.0) || !(self.arena.height > 0.0) {
            return Err(IrError::InvalidConfig(
                "arena dimensions must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deserialize from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vehicle_constants() {
        let cfg = VehicleConfig::default();
        assert_eq!(cfg.max_engine_force, 10.0);
        assert_eq!(cfg.max_brake_force, 5.0);
        assert_eq!(cfg.max_backward_force, 2.0);
        assert_eq!(cfg.reverse_speed_threshold, 0.1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_negative_force_rejected() {
        let cfg = VehicleConfig {
            max_brake_force: -1.0,
            ..VehicleConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(IrError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_mass_rejected() {
        let cfg = VehicleConfig {
            mass: 0.0,
            ..VehicleConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_scenario_from_toml() {
        let text = r#"
            dt = 0.02

            [vehicle]
            max_engine_force = 12.0

            [arena]
            width = 30.0
            height = 10.0

            [[arena.obstacles]]
            shape = "ball"
            center = [2.0, 3.0]
            radius = 0.5

            [spawn]
            mode = "fixed"
            position = [0.0, 0.0]
            heading = 90.0

            [[sensors]]
            type = "distance"
            angle = -15.0
            length = 5.0
            start = [0.0, 0.45]

            [[sensors]]
            type = "speed"

            [[commands]]
            ticks = 30
            throttle = 1.0

            [[commands]]
            ticks = 10
            throttle = -0.5
            steer = 0.25
        "#;
        let scenario = Scenario::from_toml(text).unwrap();

        assert_eq!(scenario.dt, 0.02);
        assert_eq!(scenario.vehicle.max_engine_force, 12.0);
        // Unspecified constants keep their defaults.
        assert_eq!(scenario.vehicle.max_brake_force, 5.0);
        assert_eq!(scenario.arena.obstacles.len(), 1);
        assert!(scenario.arena.walls);
        assert_eq!(scenario.sensors.len(), 2);
        assert_eq!(scenario.sensors[0].angle, Some(-15.0));
        assert_eq!(scenario.total_ticks(), 40);
        assert!(matches!(scenario.spawn, Spawn::Fixed { heading, .. } if heading == 90.0));
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_missing_sensors_use_preset() {
        let scenario = Scenario::from_toml("dt = 0.01").unwrap();
        assert_eq!(scenario.sensors, default_blueprints());
    }

    #[test]
    fn test_unknown_kind_survives_parsing() {
        let json = r#"{ "sensors": [ { "type": "lidar" } ] }"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert_eq!(scenario.sensors[0].kind, "lidar");
    }

    #[test]
    fn test_preset_toml_roundtrip() {
        let scenario = Scenario::default();
        let text = scenario.to_toml().unwrap();
        let back = Scenario::from_toml(&text).unwrap();
        assert_eq!(back.sensors, scenario.sensors);
    }
}
