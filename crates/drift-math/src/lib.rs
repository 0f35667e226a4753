#![warn(missing_docs)]

//! Math types for the drift vehicle simulator.
//!
//! Thin wrappers around nalgebra providing the planar types shared by the
//! sensor compiler, the vehicle controller and the physics adapter: points,
//! vectors and rigid poses.
//!
//! Frames follow a top-down convention: the vehicle-local forward axis is
//! `+Y`, angles are counter-clockwise positive.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// A point in the plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the plane.
pub type Vec2 = Vector2<f64>;

/// Local forward axis of a vehicle.
pub fn forward() -> Vec2 {
    Vec2::new(0.0, 1.0)
}

/// Rotate `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: &Vec2, angle: f64) -> Vec2 {
    Rotation2::new(angle) * v
}

/// Unit vector at `angle` radians from the local forward axis.
#[inline]
pub fn direction_from_forward(angle: f64) -> Vec2 {
    rotate(&forward(), angle)
}

/// A rigid planar pose: position plus heading.
///
/// `heading` is the rotation, in radians, taking vehicle-local vectors into
/// the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    /// World position of the local origin.
    pub position: Point2,
    /// Heading in radians.
    pub heading: f64,
}

impl Pose2 {
    /// Create a new pose.
    pub fn new(position: Point2, heading: f64) -> Self {
        Self { position, heading }
    }

    /// Pose at the world origin facing `+Y`.
    pub fn identity() -> Self {
        Self {
            position: Point2::origin(),
            heading: 0.0,
        }
    }

    /// Map a vehicle-local point into the world frame.
    pub fn transform_point(&self, local: &Point2) -> Point2 {
        self.position + rotate(&local.coords, self.heading)
    }

    /// Map a vehicle-local direction into the world frame.
    pub fn transform_vector(&self, local: &Vec2) -> Vec2 {
        rotate(local, self.heading)
    }

    /// World-space forward axis.
    pub fn forward(&self) -> Vec2 {
        self.transform_vector(&forward())
    }
}

impl Default for Pose2 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(&Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_positive_angle_turns_left() {
        // Counter-clockwise from +Y points towards -X.
        let d = direction_from_forward(FRAC_PI_2);
        assert_relative_eq!(d.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(d.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pose_transform_point() {
        let pose = Pose2::new(Point2::new(10.0, -2.0), PI);
        let p = pose.transform_point(&Point2::new(0.0, 0.5));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, -2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pose_forward() {
        let pose = Pose2::new(Point2::origin(), -FRAC_PI_2);
        let f = pose.forward();
        assert_relative_eq!(f.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-12);
    }
}
