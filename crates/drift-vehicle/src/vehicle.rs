//! The vehicle aggregate: sensors, controller and contact state.

use drift_ir::{BlueprintSpec, VehicleConfig};
use drift_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint::{compile, SensorKind};
use crate::contact::{ContactTracker, WorldEvent};
use crate::controller::{DriveLimits, VehicleController, WheelCommand};
use crate::error::Result;
use crate::probe::{BodyId, Canvas, WorldProbe};
use crate::sensors::SensorArray;

/// Snapshot of the vehicle state for telemetry and decision making.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    /// Front wheel steer angle in radians.
    pub steer_value: f64,
    /// Rear wheel engine force.
    pub engine_force: f64,
    /// Rear wheel brake force.
    pub brake_force: f64,
    /// Bodies currently touching the chassis.
    pub contact_count: u32,
    /// Chassis speed at the last impact.
    pub last_impact_speed: f64,
}

/// A single controllable vehicle.
///
/// Per tick the caller runs [`handle`](Self::handle) before the physics step
/// and [`update_sensors`](Self::update_sensors) after it, forwarding the
/// step's collision events to [`on_world_event`](Self::on_world_event).
#[derive(Debug, Clone)]
pub struct Vehicle {
    config: VehicleConfig,
    sensors: SensorArray,
    speed_sensor: Option<usize>,
    controller: VehicleController,
    contacts: ContactTracker,
    overlay_visible: bool,
}

impl Vehicle {
    /// Build a vehicle bound to the chassis `body`.
    ///
    /// Validates `config` and compiles `blueprints`; fails without building
    /// anything if either is invalid.
    pub fn new(config: VehicleConfig, blueprints: &[BlueprintSpec], body: BodyId) -> Result<Self> {
        config.validate()?;
        let sensors = compile(blueprints)?;
        let speed_sensor = sensors.position_of(SensorKind::Speed);
        let controller = VehicleController::new(DriveLimits::from(&config));

        debug!(
            body = body.0,
            sensors = sensors.len(),
            has_speed = speed_sensor.is_some(),
            "vehicle ready"
        );

        Ok(Self {
            config,
            sensors,
            speed_sensor,
            controller,
            contacts: ContactTracker::new(body),
            overlay_visible: true,
        })
    }

    /// Turn throttle/steer into wheel actuation.
    pub fn handle(&mut self, throttle: f64, steer: f64, rear_wheel_speed: f64) -> WheelCommand {
        self.controller.handle(throttle, steer, rear_wheel_speed)
    }

    /// Re-sample all sensors.
    pub fn update_sensors<P: WorldProbe + ?Sized>(&mut self, probe: &P) {
        self.sensors.update(probe);
    }

    /// Apply a collision event; events about other bodies are ignored.
    pub fn on_world_event(&mut self, event: &WorldEvent, chassis_velocity: &Vec2) -> bool {
        self.contacts.apply(event, chassis_velocity)
    }

    /// Forget the last impact.
    pub fn reset_impact(&mut self) {
        self.contacts.reset_impact();
    }

    /// Show or hide the sensor overlay.
    pub fn toggle_overlay(&mut self) {
        self.overlay_visible = !self.overlay_visible;
    }

    /// Set overlay visibility.
    pub fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay_visible = visible;
    }

    /// Whether the overlay is drawn.
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Draw the sensor overlay, if visible.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if !self.overlay_visible {
            return;
        }
        self.sensors.draw(canvas);
    }

    /// Current state snapshot.
    pub fn state(&self) -> VehicleState {
        let cmd = self.controller.command();
        VehicleState {
            steer_value: cmd.steer_value,
            engine_force: cmd.engine_force,
            brake_force: cmd.brake_force,
            contact_count: self.contacts.contact_count(),
            last_impact_speed: self.contacts.last_impact_speed(),
        }
    }

    /// Reading of the first speed sensor.
    pub fn speed(&self) -> Option<f64> {
        self.speed_sensor
            .and_then(|i| self.sensors.get(i))
            .map(|s| s.reading())
    }

    /// Compiled sensors.
    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    /// Drive controller.
    pub fn controller(&self) -> &VehicleController {
        &self.controller
    }

    /// Construction constants.
    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Chassis body this vehicle answers for.
    pub fn body(&self) -> BodyId {
        self.contacts.body()
    }
}
