//! Analytic stand-in for the physics world used by unit tests.

use std::cell::Cell;

use drift_math::{Point2, Pose2, Vec2};

use crate::probe::WorldProbe;

/// A world made of discs, with a scripted chassis pose and velocity.
pub(crate) struct CircleWorld {
    pose: Pose2,
    velocity: Vec2,
    circles: Vec<(Point2, f64)>,
    fixed_hit: Option<f64>,
    casts: Cell<usize>,
}

impl CircleWorld {
    pub(crate) fn empty() -> Self {
        Self {
            pose: Pose2::identity(),
            velocity: Vec2::zeros(),
            circles: Vec::new(),
            fixed_hit: None,
            casts: Cell::new(0),
        }
    }

    pub(crate) fn with_pose(mut self, pose: Pose2) -> Self {
        self.pose = pose;
        self
    }

    pub(crate) fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub(crate) fn with_circle(mut self, center: Point2, radius: f64) -> Self {
        self.circles.push((center, radius));
        self
    }

    /// Report this distance for every cast, ignoring the range.
    pub(crate) fn with_fixed_hit(mut self, distance: f64) -> Self {
        self.fixed_hit = Some(distance);
        self
    }

    pub(crate) fn casts(&self) -> usize {
        self.casts.get()
    }
}

impl WorldProbe for CircleWorld {
    fn pose(&self) -> Pose2 {
        self.pose
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn cast_ray(&self, origin: &Point2, direction: &Vec2, max_length: f64) -> Option<f64> {
        self.casts.set(self.casts.get() + 1);
        if self.fixed_hit.is_some() {
            return self.fixed_hit;
        }

        self.circles
            .iter()
            .filter_map(|(center, radius)| {
                let m = origin - center;
                let b = m.dot(direction);
                let c = m.norm_squared() - radius * radius;
                if c > 0.0 && b > 0.0 {
                    return None;
                }
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                Some((-b - disc.sqrt()).max(0.0))
            })
            .filter(|t| *t <= max_length)
            .min_by(|a, b| a.total_cmp(b))
    }
}
