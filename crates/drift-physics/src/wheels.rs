//! Top-down two-wheel vehicle model.
//!
//! Each wheel pushes the chassis at its attachment point: engine force along
//! the wheel's rolling axis, brake force against forward slip, side friction
//! against lateral slip. Brake and side friction are capped forces sized to
//! cancel the slip at the wheel within one step.

use drift_ir::{VehicleConfig, WheelConfig};
use drift_math::{forward, rotate, Point2, Vec2};
use drift_vehicle::WheelCommand;
use nalgebra::{Point2 as RPoint2, Vector2};
use rapier2d::prelude::{Real, RigidBodyHandle};

use crate::world::ArenaWorld;

/// One wheel in the chassis frame.
#[derive(Debug, Clone)]
pub struct Wheel {
    local_position: Point2,
    side_friction: f64,
    steer_value: f64,
    engine_force: f64,
    brake_force: f64,
}

impl Wheel {
    /// Wheel at the configured attachment point.
    pub fn new(config: &WheelConfig) -> Self {
        Self {
            local_position: Point2::new(config.position[0], config.position[1]),
            side_friction: config.side_friction,
            steer_value: 0.0,
            engine_force: 0.0,
            brake_force: 0.0,
        }
    }

    /// Steer angle in radians; positive is left.
    pub fn steer_value(&self) -> f64 {
        self.steer_value
    }

    /// Engine force along the rolling axis.
    pub fn engine_force(&self) -> f64 {
        self.engine_force
    }

    /// Brake force cap.
    pub fn brake_force(&self) -> f64 {
        self.brake_force
    }

    fn local_forward(&self) -> Vec2 {
        rotate(&forward(), self.steer_value)
    }

    /// Speed along the wheel's rolling axis; positive when rolling forward.
    pub fn speed(&self, world: &ArenaWorld, chassis: RigidBodyHandle) -> f64 {
        let Some(pose) = world.body_pose(chassis) else {
            return 0.0;
        };
        let point = pose.transform_point(&self.local_position);
        let axis = pose.transform_vector(&self.local_forward());
        world
            .velocity_at_point(chassis, &point)
            .map_or(0.0, |v| v.dot(&axis))
    }

    /// World force and application point for this step.
    fn force(
        &self,
        world: &ArenaWorld,
        chassis: RigidBodyHandle,
        inertia: &ChassisInertia,
        dt: f64,
    ) -> Option<(Vec2, Point2)> {
        let pose = world.body_pose(chassis)?;
        let point = pose.transform_point(&self.local_position);
        let axis = pose.transform_vector(&self.local_forward());
        let lateral = Vec2::new(axis.y, -axis.x);
        let arm = point - pose.position;

        let velocity = world.velocity_at_point(chassis, &point)?;
        let forward_slip = velocity.dot(&axis);
        let side_slip = velocity.dot(&lateral);

        let brake = (-forward_slip * inertia.effective_mass(&arm, &axis) / dt)
            .clamp(-self.brake_force, self.brake_force);
        let side = (-side_slip * inertia.effective_mass(&arm, &lateral) / dt)
            .clamp(-self.side_friction, self.side_friction);

        Some((axis * (self.engine_force + brake) + lateral * side, point))
    }
}

/// Mass and moment of inertia of a uniform box chassis.
#[derive(Debug, Clone, Copy)]
struct ChassisInertia {
    mass: f64,
    moment: f64,
}

impl ChassisInertia {
    fn from_config(config: &VehicleConfig) -> Self {
        let [w, l] = config.chassis_size;
        Self {
            mass: config.mass,
            moment: config.mass * (w * w + l * l) / 12.0,
        }
    }

    /// Mass felt by a force along `direction` applied at lever `arm`.
    fn effective_mass(&self, arm: &Vec2, direction: &Vec2) -> f64 {
        let cross = arm.x * direction.y - arm.y * direction.x;
        1.0 / (1.0 / self.mass + cross * cross / self.moment)
    }
}

/// Steered front wheel plus driven rear wheel on one chassis.
#[derive(Debug, Clone)]
pub struct TopDownVehicle {
    chassis: RigidBodyHandle,
    inertia: ChassisInertia,
    front: Wheel,
    rear: Wheel,
}

impl TopDownVehicle {
    /// Attach wheels to `chassis` as described by `config`.
    pub fn new(chassis: RigidBodyHandle, config: &VehicleConfig) -> Self {
        Self {
            chassis,
            inertia: ChassisInertia::from_config(config),
            front: Wheel::new(&config.front_wheel),
            rear: Wheel::new(&config.rear_wheel),
        }
    }

    /// Latch the actuation for the coming step.
    pub fn set_command(&mut self, command: &WheelCommand) {
        self.front.steer_value = command.steer_value;
        self.rear.engine_force = command.engine_force;
        self.rear.brake_force = command.brake_force;
    }

    /// Rear wheel rolling speed.
    pub fn rear_speed(&self, world: &ArenaWorld) -> f64 {
        self.rear.speed(world, self.chassis)
    }

    /// Replace the chassis forces with this step's wheel forces.
    pub fn apply(&self, world: &mut ArenaWorld, dt: f64) {
        let forces: Vec<_> = [&self.front, &self.rear]
            .into_iter()
            .filter_map(|wheel| wheel.force(world, self.chassis, &self.inertia, dt))
            .collect();

        let Some(body) = world.body_mut(self.chassis) else {
            return;
        };
        body.reset_forces(true);
        for (force, point) in forces {
            body.add_force_at_point(
                Vector2::new(force.x as Real, force.y as Real),
                RPoint2::new(point.x as Real, point.y as Real),
                true,
            );
        }
    }

    /// Chassis the wheels are attached to.
    pub fn chassis(&self) -> RigidBodyHandle {
        self.chassis
    }

    /// Steered wheel.
    pub fn front(&self) -> &Wheel {
        &self.front
    }

    /// Driven wheel.
    pub fn rear(&self) -> &Wheel {
        &self.rear
    }
}
