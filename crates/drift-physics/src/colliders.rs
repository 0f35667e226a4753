//! Collision shapes for the arena and the chassis.

use drift_ir::{ArenaConfig, Obstacle, VehicleConfig};
use nalgebra::{Isometry2, Vector2};
use parry2d::shape::SharedShape;
use rapier2d::prelude::{ActiveEvents, ColliderBuilder, Real};

use crate::error::PhysicsError;

/// Wall thickness around the arena.
pub const WALL_THICKNESS: f64 = 1.0;

/// A static shape and where it sits in the world.
pub struct StaticShape {
    /// Human-readable name for diagnostics.
    pub name: String,
    /// Collision shape.
    pub shape: SharedShape,
    /// World placement.
    pub position: Isometry2<Real>,
}

/// Shapes for the four walls enclosing the arena.
///
/// The walls sit outside the `width` x `height` rectangle, so the whole
/// interior is drivable.
pub fn arena_walls(arena: &ArenaConfig) -> Vec<StaticShape> {
    let hw = (arena.width / 2.0) as Real;
    let hh = (arena.height / 2.0) as Real;
    let t = (WALL_THICKNESS / 2.0) as Real;

    let horizontal = SharedShape::cuboid(hw + 2.0 * t, t);
    let vertical = SharedShape::cuboid(t, hh + 2.0 * t);

    vec![
        StaticShape {
            name: "wall_north".into(),
            shape: horizontal.clone(),
            position: Isometry2::translation(0.0, hh + t),
        },
        StaticShape {
            name: "wall_south".into(),
            shape: horizontal,
            position: Isometry2::translation(0.0, -hh - t),
        },
        StaticShape {
            name: "wall_east".into(),
            shape: vertical.clone(),
            position: Isometry2::translation(hw + t, 0.0),
        },
        StaticShape {
            name: "wall_west".into(),
            shape: vertical,
            position: Isometry2::translation(-hw - t, 0.0),
        },
    ]
}

/// Build the collision shape for a configured obstacle.
pub fn obstacle_shape(obstacle: &Obstacle, index: usize) -> Result<StaticShape, PhysicsError> {
    let name = format!("obstacle_{index}");

    match obstacle {
        Obstacle::Box {
            center,
            size,
            angle,
        } => {
            if size.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
                return Err(PhysicsError::CollisionShape {
                    name,
                    reason: format!("box size must be positive, got {size:?}"),
                });
            }
            Ok(StaticShape {
                name,
                shape: SharedShape::cuboid((size[0] / 2.0) as Real, (size[1] / 2.0) as Real),
                position: Isometry2::new(
                    Vector2::new(center[0] as Real, center[1] as Real),
                    angle.to_radians() as Real,
                ),
            })
        }
        Obstacle::Ball { center, radius } => {
            if !(*radius > 0.0) || !radius.is_finite() {
                return Err(PhysicsError::CollisionShape {
                    name,
                    reason: format!("ball radius must be positive, got {radius}"),
                });
            }
            Ok(StaticShape {
                name,
                shape: SharedShape::ball(*radius as Real),
                position: Isometry2::translation(center[0] as Real, center[1] as Real),
            })
        }
    }
}

/// Chassis collider: a box `chassis_size` wide and long, with collision and
/// contact-force events enabled so contacts and impacts are reported.
pub fn chassis_collider(config: &VehicleConfig, impact_force_threshold: f64) -> ColliderBuilder {
    let [width, length] = config.chassis_size;

    ColliderBuilder::new(SharedShape::cuboid(
        (width / 2.0) as Real,
        (length / 2.0) as Real,
    ))
    .mass(config.mass as Real)
    .friction(0.3)
    .restitution(0.1)
    .active_events(ActiveEvents::COLLISION_EVENTS | ActiveEvents::CONTACT_FORCE_EVENTS)
    .contact_force_event_threshold(impact_force_threshold as Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_walls() {
        let walls = arena_walls(&ArenaConfig::default());
        assert_eq!(walls.len(), 4);
        let north = &walls[0];
        let cuboid = north.shape.as_cuboid().unwrap();
        assert!(cuboid.half_extents.x > 10.0);
        assert!((north.position.translation.y - 10.5).abs() < 1e-6);
    }

    #[test]
    fn test_box_obstacle() {
        let obstacle = Obstacle::Box {
            center: [1.0, 2.0],
            size: [2.0, 4.0],
            angle: 90.0,
        };
        let shape = obstacle_shape(&obstacle, 0).unwrap();
        let cuboid = shape.shape.as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents, Vector2::new(1.0, 2.0));
        assert!((shape.position.rotation.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_ball_obstacle() {
        let obstacle = Obstacle::Ball {
            center: [0.0, 5.0],
            radius: 0.5,
        };
        let shape = obstacle_shape(&obstacle, 3).unwrap();
        assert!(shape.shape.as_ball().is_some());
        assert_eq!(shape.name, "obstacle_3");
    }

    #[test]
    fn test_degenerate_obstacle_rejected() {
        let obstacle = Obstacle::Ball {
            center: [0.0, 0.0],
            radius: 0.0,
        };
        assert!(matches!(
            obstacle_shape(&obstacle, 1),
            Err(PhysicsError::CollisionShape { .. })
        ));
    }
}
