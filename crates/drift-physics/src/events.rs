//! Collecting Rapier collision callbacks into vehicle-level events.

use std::collections::HashSet;
use std::sync::Mutex;

use drift_vehicle::{BodyId, ContactKind, WorldEvent};
use rapier2d::prelude::{
    ColliderHandle, ColliderSet, CollisionEvent, ContactPair, EventHandler, Real,
    RigidBodyHandle, RigidBodySet,
};

/// Stable identity of a Rapier body for the vehicle layer.
pub fn body_id(handle: RigidBodyHandle) -> BodyId {
    let (index, generation) = handle.into_raw_parts();
    BodyId((u64::from(generation) << 32) | u64::from(index))
}

#[derive(Default)]
struct Pending {
    events: Vec<WorldEvent>,
    /// Collider pairs that already reported their impact for the current
    /// contact.
    impacted: HashSet<PairKey>,
}

/// Buffers events raised during a pipeline step.
///
/// Rapier invokes the handler from inside `PhysicsPipeline::step`; the
/// buffer is drained right after the step returns.
#[derive(Default)]
pub struct EventBuffer {
    pending: Mutex<Pending>,
}

impl EventBuffer {
    /// Take the events collected since the last drain.
    pub fn drain(&self) -> Vec<WorldEvent> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut pending.events)
    }

    fn push(
        &self,
        kind: ContactKind,
        pair: (ColliderHandle, ColliderHandle),
        colliders: &ColliderSet,
    ) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());

        let key = pair_key(pair);
        match kind {
            ContactKind::End => {
                pending.impacted.remove(&key);
            }
            ContactKind::Impact => {
                if !pending.impacted.insert(key) {
                    return;
                }
            }
            ContactKind::Begin => {}
        }

        let parent = |h: ColliderHandle| colliders.get(h).and_then(|c| c.parent());
        let (Some(a), Some(b)) = (parent(pair.0), parent(pair.1)) else {
            return;
        };
        pending.events.push(WorldEvent {
            kind,
            body_a: body_id(a),
            body_b: body_id(b),
        });
    }
}

type PairKey = ((u32, u32), (u32, u32));

/// Order-independent key for a collider pair.
fn pair_key((a, b): (ColliderHandle, ColliderHandle)) -> PairKey {
    let (a, b) = (a.into_raw_parts(), b.into_raw_parts());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl EventHandler for EventBuffer {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let kind = if event.started() {
            ContactKind::Begin
        } else {
            ContactKind::End
        };
        self.push(kind, (event.collider1(), event.collider2()), colliders);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
        self.push(
            ContactKind::Impact,
            (contact_pair.collider1, contact_pair.collider2),
            colliders,
        );
    }
}
