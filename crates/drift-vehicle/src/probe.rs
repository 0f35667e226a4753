//! Seams to the physics engine and the renderer.

use drift_math::{Point2, Pose2, Vec2};
use serde::{Deserialize, Serialize};

/// Opaque identity of a rigid body in the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

/// Read access to the world as seen from one chassis.
///
/// Implementations answer for the chassis they are bound to; ray casts must
/// ignore the chassis itself.
pub trait WorldProbe {
    /// Current chassis pose.
    fn pose(&self) -> Pose2;

    /// Current chassis linear velocity.
    fn linear_velocity(&self) -> Vec2;

    /// Cast a ray from `origin` along the unit vector `direction`.
    ///
    /// Returns the distance to the nearest hit within `max_length`, or `None`.
    fn cast_ray(&self, origin: &Point2, direction: &Vec2, max_length: f64) -> Option<f64>;
}

/// A drawing surface for the sensor overlay.
pub trait Canvas {
    /// Draw a segment; `intensity` is the normalized sensor reading in `[0, 1]`.
    fn line(&mut self, from: Point2, to: Point2, intensity: f64);
}

/// A recorded overlay segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment start.
    pub from: Point2,
    /// Segment end.
    pub to: Point2,
    /// Normalized reading.
    pub intensity: f64,
}

/// A [`Canvas`] that stores segments instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct SegmentRecorder {
    /// Segments in draw order.
    pub segments: Vec<Segment>,
}

impl SegmentRecorder {
    /// Drop all recorded segments.
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

impl Canvas for SegmentRecorder {
    fn line(&mut self, from: Point2, to: Point2, intensity: f64) {
        self.segments.push(Segment {
            from,
            to,
            intensity,
        });
    }
}
