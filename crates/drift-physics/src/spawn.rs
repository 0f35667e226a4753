//! Start poses.

use std::f64::consts::{PI, TAU};

use drift_ir::{ArenaConfig, Spawn, VehicleConfig};
use drift_math::{Point2, Pose2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniformly random pose inside `arena`, heading in (-π, π].
pub fn random_pose<R: Rng + ?Sized>(arena: &ArenaConfig, rng: &mut R) -> Pose2 {
    let x = rng.gen_range(-0.5_f64..0.5) * arena.width;
    let y = rng.gen_range(-0.5_f64..0.5) * arena.height;
    let heading = PI - rng.gen_range(0.0..TAU);
    Pose2::new(Point2::new(x, y), heading)
}

/// Resolve the configured start pose.
///
/// Random spawns keep the whole chassis inside the walls by shrinking the
/// sampled area by the chassis' half diagonal.
pub fn spawn_pose(spawn: &Spawn, arena: &ArenaConfig, vehicle: &VehicleConfig) -> Pose2 {
    match spawn {
        Spawn::Random { seed } => {
            let [w, l] = vehicle.chassis_size;
            let margin = w.hypot(l);
            let area = ArenaConfig {
                width: (arena.width - margin).max(0.0),
                height: (arena.height - margin).max(0.0),
                ..ArenaConfig::default()
            };
            random_pose(&area, &mut StdRng::seed_from_u64(*seed))
        }
        Spawn::Fixed { position, heading } => Pose2::new(
            Point2::new(position[0], position[1]),
            heading.to_radians(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_random_pose_in_bounds() {
        let arena = ArenaConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let pose = random_pose(&arena, &mut rng);
            assert!(pose.position.x.abs() <= 10.0);
            assert!(pose.position.y.abs() <= 10.0);
            assert!(pose.heading > -PI && pose.heading <= PI);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let spawn = Spawn::Random { seed: 42 };
        let arena = ArenaConfig::default();
        let vehicle = VehicleConfig::default();
        assert_eq!(
            spawn_pose(&spawn, &arena, &vehicle),
            spawn_pose(&spawn, &arena, &vehicle)
        );
        assert_ne!(
            spawn_pose(&spawn, &arena, &vehicle),
            spawn_pose(&Spawn::Random { seed: 43 }, &arena, &vehicle)
        );
    }

    #[test]
    fn test_random_spawn_clears_walls() {
        let arena = ArenaConfig {
            width: 4.0,
            height: 4.0,
            ..ArenaConfig::default()
        };
        let vehicle = VehicleConfig::default();
        let reach = 0.5 * 1.0_f64.hypot(0.5);
        for seed in 0..100 {
            let pose = spawn_pose(&Spawn::Random { seed }, &arena, &vehicle);
            assert!(pose.position.x.abs() + reach <= 2.0);
            assert!(pose.position.y.abs() + reach <= 2.0);
        }
    }

    #[test]
    fn test_fixed_spawn_uses_degrees() {
        let spawn = Spawn::Fixed {
            position: [1.0, -2.0],
            heading: 90.0,
        };
        let pose = spawn_pose(&spawn, &ArenaConfig::default(), &VehicleConfig::default());
        assert_eq!(pose.position, Point2::new(1.0, -2.0));
        assert_relative_eq!(pose.heading, std::f64::consts::FRAC_PI_2);
    }
}
