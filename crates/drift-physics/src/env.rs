//! Episode driver: one vehicle in one arena, stepped a tick at a time.

use drift_ir::Scenario;
use drift_math::{Pose2, Vec2};
use drift_vehicle::{Canvas, Vehicle, VehicleState};
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::PhysicsError;
use crate::events::body_id;
use crate::spawn::spawn_pose;
use crate::wheels::TopDownVehicle;
use crate::world::ArenaWorld;

/// Episode length when the scenario scripts no commands.
pub const DEFAULT_MAX_STEPS: u64 = 1000;

/// Control input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Throttle in `[-1, 1]`; negative brakes, then reverses.
    pub throttle: f64,
    /// Steer in `[-1, 1]`; positive is left.
    pub steer: f64,
}

/// What the vehicle knows after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Tick index; zero right after a reset.
    pub step: u64,
    /// Raw sensor readings, in declaration order.
    pub readings: Vec<f64>,
    /// Normalized sensor readings, in declaration order.
    pub normalized: Vec<f64>,
    /// Speed sensor reading, if one is configured.
    pub speed: Option<f64>,
    /// Bodies currently touching the chassis.
    pub contact_count: u32,
    /// Chassis speed at the last impact.
    pub last_impact_speed: f64,
    /// Chassis pose.
    pub pose: Pose2,
    /// Actuation and contact snapshot.
    pub state: VehicleState,
}

/// A scenario turned into a steppable simulation.
pub struct DriveEnv {
    scenario: Scenario,
    world: ArenaWorld,
    wheels: TopDownVehicle,
    vehicle: Vehicle,
    chassis: RigidBodyHandle,
    max_steps: u64,
    current_step: u64,
}

impl DriveEnv {
    /// Build the arena, spawn the chassis and compile its sensors.
    ///
    /// Fails before anything is simulated if the scenario or any sensor
    /// blueprint is invalid.
    pub fn new(scenario: Scenario) -> Result<Self, PhysicsError> {
        scenario.validate()?;
        let (world, wheels, vehicle) = Self::build(&scenario)?;
        let chassis = wheels.chassis();
        let max_steps = match scenario.total_ticks() {
            0 => DEFAULT_MAX_STEPS,
            n => n,
        };

        let mut env = Self {
            scenario,
            world,
            wheels,
            vehicle,
            chassis,
            max_steps,
            current_step: 0,
        };
        env.sense();
        Ok(env)
    }

    fn build(scenario: &Scenario) -> Result<(ArenaWorld, TopDownVehicle, Vehicle), PhysicsError> {
        let mut world = ArenaWorld::from_arena(&scenario.arena)?;
        let pose = spawn_pose(&scenario.spawn, &scenario.arena, &scenario.vehicle);
        let chassis = world.spawn_chassis(&scenario.vehicle, pose);
        let wheels = TopDownVehicle::new(chassis, &scenario.vehicle);
        let vehicle = Vehicle::new(
            scenario.vehicle.clone(),
            &scenario.sensors,
            body_id(chassis),
        )?;
        Ok((world, wheels, vehicle))
    }

    /// Start a fresh episode from the scenario's initial state.
    ///
    /// Returns the initial observation.
    pub fn reset(&mut self) -> Result<Observation, PhysicsError> {
        let (world, wheels, vehicle) = Self::build(&self.scenario)?;
        self.chassis = wheels.chassis();
        self.world = world;
        self.wheels = wheels;
        self.vehicle = vehicle;
        self.current_step = 0;
        self.sense();

        debug!(max_steps = self.max_steps, "episode reset");
        Ok(self.observe())
    }

    /// Run one tick.
    ///
    /// Actuation is decided from the pre-step wheel speed, the world is
    /// integrated, the step's collision events are applied and the sensors
    /// re-cast against the new state. Returns the observation and whether
    /// the episode has reached its step limit.
    pub fn step(&mut self, action: Action) -> (Observation, bool) {
        let dt = self.scenario.dt;

        let rear_speed = self.wheels.rear_speed(&self.world);
        let command = self.vehicle.handle(action.throttle, action.steer, rear_speed);
        self.wheels.set_command(&command);
        self.wheels.apply(&mut self.world, dt);

        let approach = self
            .world
            .body_velocity(self.chassis)
            .unwrap_or_else(Vec2::zeros);
        let events = self.world.step(dt);
        for event in &events {
            self.vehicle.on_world_event(event, &approach);
        }

        self.sense();
        self.current_step += 1;

        let obs = self.observe();
        if !obs.pose.position.coords.iter().all(|c| c.is_finite()) || !obs.pose.heading.is_finite() {
            warn!(step = self.current_step, "chassis pose is not finite");
        }
        trace!(
            step = self.current_step,
            x = obs.pose.position.x,
            y = obs.pose.position.y,
            heading = obs.pose.heading,
            events = events.len(),
            contacts = obs.contact_count,
            "tick"
        );

        let done = self.current_step >= self.max_steps;
        (obs, done)
    }

    fn sense(&mut self) {
        let probe = self.world.probe(self.chassis);
        self.vehicle.update_sensors(&probe);
    }

    /// Current observation without stepping.
    pub fn observe(&self) -> Observation {
        let sensors = self.vehicle.sensors();
        let state = self.vehicle.state();
        Observation {
            step: self.current_step,
            readings: sensors.readings(),
            normalized: sensors.normalized_readings(),
            speed: self.vehicle.speed(),
            contact_count: state.contact_count,
            last_impact_speed: state.last_impact_speed,
            pose: self.world.body_pose(self.chassis).unwrap_or_default(),
            state,
        }
    }

    /// Flip the sensor overlay.
    pub fn toggle_overlay(&mut self) {
        self.vehicle.toggle_overlay();
    }

    /// Draw the sensor overlay, if visible.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        self.vehicle.draw(canvas);
    }

    /// Set the episode length.
    pub fn set_max_steps(&mut self, max_steps: u64) {
        self.max_steps = max_steps;
    }

    /// Episode length.
    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Ticks run since the last reset.
    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    /// Scenario this environment runs.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The simulated vehicle.
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// The wheel model.
    pub fn wheels(&self) -> &TopDownVehicle {
        &self.wheels
    }

    /// The physics world.
    pub fn world(&self) -> &ArenaWorld {
        &self.world
    }
}
