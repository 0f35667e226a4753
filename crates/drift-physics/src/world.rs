//! Arena world management using Rapier2d.

use drift_ir::{ArenaConfig, VehicleConfig};
use drift_math::{Point2, Pose2, Vec2};
use drift_vehicle::{WorldEvent, WorldProbe};
use nalgebra::{Point2 as RPoint2, Vector2};
use rapier2d::prelude::{
    BroadPhaseMultiSap, CCDSolver, ColliderBuilder, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryFilter, QueryPipeline, Ray, Real, RigidBody, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet,
};
use tracing::debug;

use crate::colliders::{arena_walls, chassis_collider, obstacle_shape, StaticShape};
use crate::error::PhysicsError;
use crate::events::EventBuffer;

/// A top-down physics world: static walls and obstacles plus any number of
/// dynamic chassis bodies. Gravity is zero.
pub struct ArenaWorld {
    // Rapier components
    pipeline: PhysicsPipeline,
    gravity: Vector2<Real>,
    integration_params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    events: EventBuffer,

    arena: ArenaConfig,
}

impl ArenaWorld {
    /// Build the world described by `arena`.
    pub fn from_arena(arena: &ArenaConfig) -> Result<Self, PhysicsError> {
        let mut world = Self::new(arena.clone());

        if arena.walls {
            for wall in arena_walls(arena) {
                world.insert_static(wall);
            }
        }
        for (index, obstacle) in arena.obstacles.iter().enumerate() {
            let shape = obstacle_shape(obstacle, index)?;
            world.insert_static(shape);
        }

        world.query_pipeline.update(&world.colliders);
        debug!(
            bodies = world.bodies.len(),
            colliders = world.colliders.len(),
            "arena built"
        );
        Ok(world)
    }

    /// Create an empty world.
    fn new(arena: ArenaConfig) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: Vector2::zeros(),
            integration_params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            events: EventBuffer::default(),
            arena,
        }
    }

    fn insert_static(&mut self, item: StaticShape) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed().position(item.position).build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::new(item.shape).friction(0.5).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        debug!(name = %item.name, "static shape added");
        handle
    }

    /// Add a vehicle chassis at `pose`.
    pub fn spawn_chassis(&mut self, config: &VehicleConfig, pose: Pose2) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector2::new(pose.position.x as Real, pose.position.y as Real))
            .rotation(pose.heading as Real)
            .linear_damping(config.linear_damping as Real)
            .angular_damping(config.angular_damping as Real)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = chassis_collider(config, self.arena.impact_force_threshold).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.query_pipeline.update(&self.colliders);

        debug!(
            x = pose.position.x,
            y = pose.position.y,
            heading = pose.heading,
            "chassis spawned"
        );
        handle
    }

    /// Step the simulation by `dt` seconds.
    ///
    /// Returns the collision events raised during the step, in the order
    /// Rapier reported them.
    pub fn step(&mut self, dt: f64) -> Vec<WorldEvent> {
        self.integration_params.dt = dt as Real;

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );

        self.events.drain()
    }

    /// Distance to the nearest collider along a ray, skipping `exclude`.
    ///
    /// `direction` must be a unit vector. A ray starting inside a shape hits
    /// at distance zero.
    pub fn cast_ray(
        &self,
        origin: &Point2,
        direction: &Vec2,
        max_length: f64,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<f64> {
        let ray = Ray::new(
            RPoint2::new(origin.x as Real, origin.y as Real),
            Vector2::new(direction.x as Real, direction.y as Real),
        );
        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        self.query_pipeline
            .cast_ray(
                &self.bodies,
                &self.colliders,
                &ray,
                max_length as Real,
                true,
                filter,
            )
            .map(|(_, toi)| f64::from(toi))
    }

    /// Pose of a body.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<Pose2> {
        let pos = self.bodies.get(handle)?.position();
        Some(Pose2::new(
            Point2::new(
                f64::from(pos.translation.x),
                f64::from(pos.translation.y),
            ),
            f64::from(pos.rotation.angle()),
        ))
    }

    /// Linear velocity of a body.
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let v = self.bodies.get(handle)?.linvel();
        Some(Vec2::new(f64::from(v.x), f64::from(v.y)))
    }

    /// Velocity of the material point of a body at world position `point`.
    pub fn velocity_at_point(&self, handle: RigidBodyHandle, point: &Point2) -> Option<Vec2> {
        let v = self
            .bodies
            .get(handle)?
            .velocity_at_point(&RPoint2::new(point.x as Real, point.y as Real));
        Some(Vec2::new(f64::from(v.x), f64::from(v.y)))
    }

    pub(crate) fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// A [`WorldProbe`] answering for `chassis`.
    pub fn probe(&self, chassis: RigidBodyHandle) -> ChassisProbe<'_> {
        ChassisProbe {
            world: self,
            chassis,
        }
    }

    /// Arena this world was built from.
    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    /// Number of rigid bodies, static ones included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// The world seen from one chassis; rays ignore the chassis itself.
pub struct ChassisProbe<'a> {
    world: &'a ArenaWorld,
    chassis: RigidBodyHandle,
}

impl WorldProbe for ChassisProbe<'_> {
    fn pose(&self) -> Pose2 {
        self.world.body_pose(self.chassis).unwrap_or_default()
    }

    fn linear_velocity(&self) -> Vec2 {
        self.world
            .body_velocity(self.chassis)
            .unwrap_or_else(Vec2::zeros)
    }

    fn cast_ray(&self, origin: &Point2, direction: &Vec2, max_length: f64) -> Option<f64> {
        self.world
            .cast_ray(origin, direction, max_length, Some(self.chassis))
    }
}
