//! Contact and impact bookkeeping driven by physics events.

use drift_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::probe::BodyId;

/// What happened between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// The bodies started touching.
    Begin,
    /// The bodies stopped touching.
    End,
    /// The bodies collided hard enough to count as an impact.
    Impact,
}

/// A collision notification from the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Event type.
    pub kind: ContactKind,
    /// First body of the pair.
    pub body_a: BodyId,
    /// Second body of the pair.
    pub body_b: BodyId,
}

impl WorldEvent {
    /// True if either side of the pair is `body`.
    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// Counts open contacts and remembers the last impact for one chassis.
#[derive(Debug, Clone)]
pub struct ContactTracker {
    body: BodyId,
    contact_count: u32,
    last_impact_speed: f64,
}

impl ContactTracker {
    /// Track events that involve `body`.
    pub fn new(body: BodyId) -> Self {
        Self {
            body,
            contact_count: 0,
            last_impact_speed: 0.0,
        }
    }

    /// Fold one event into the counters.
    ///
    /// `chassis_velocity` is the tracked body's velocity when the event was
    /// raised; only impacts use it. Returns `false` for events about other
    /// bodies, which are ignored.
    pub fn apply(&mut self, event: &WorldEvent, chassis_velocity: &Vec2) -> bool {
        if !event.involves(self.body) {
            return false;
        }

        match event.kind {
            ContactKind::Begin => self.contact_count += 1,
            ContactKind::End => match self.contact_count.checked_sub(1) {
                Some(n) => self.contact_count = n,
                None => warn!(body = self.body.0, "end-contact without matching begin"),
            },
            ContactKind::Impact => self.last_impact_speed = chassis_velocity.norm(),
        }
        true
    }

    /// Tracked body.
    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Number of bodies currently touching the chassis.
    pub fn contact_count(&self) -> u32 {
        self.contact_count
    }

    /// Chassis speed at the last impact.
    pub fn last_impact_speed(&self) -> f64 {
        self.last_impact_speed
    }

    /// Forget the last impact.
    pub fn reset_impact(&mut self) {
        self.last_impact_speed = 0.0;
    }
}
