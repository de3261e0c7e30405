//! Entity creation helpers shared by world generation, wave sub-waves, and
//! item drops.

use glam::Vec2;

use holdfast_core::{entity_baseline, Entity, EntityId, EntityKind};

/// Builds a freshly spawned entity of `kind` at `position`, using the
/// per-kind baseline stats table.
#[must_use]
pub fn spawn_entity(kind: EntityKind, position: Vec2) -> Entity {
    let baseline = entity_baseline(kind);
    Entity {
        kind,
        position,
        velocity: Vec2::ZERO,
        size: baseline.size,
        hp: baseline.max_hp,
        max_hp: baseline.max_hp,
        grounded: false,
        submerged: false,
        seconds_out_of_water: 0.0,
    }
}

/// A monotonically increasing entity id allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    /// Allocates the next id in sequence.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId::from_raw(self.next);
        self.next += 1;
        id
    }
}
