//! External input and the events a tick emits.

use glam::Vec2;

use crate::coord::Coord;
use crate::entity::EntityId;
use crate::material::MaterialKind;

/// A single externally-sourced instruction applied to the world before or
/// during a tick, dispatched through `World::tick`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Move the player by a normalized direction at the configured speed.
    /// `direction_y` only takes effect while climbing a rope.
    MovePlayer {
        /// Desired horizontal direction in `[-1.0, 1.0]`.
        direction_x: f32,
        /// Desired vertical direction in `[-1.0, 1.0]` (rope climbing only).
        direction_y: f32,
    },
    /// Player jump request.
    PlayerJump,
    /// Player grabs/releases a rope at their current position.
    PlayerToggleClimb,
    /// Place a block of `material` at `coord`, consuming one from the
    /// player's inventory.
    PlaceBlock {
        /// Where to place it.
        coord: Coord,
        /// What to place.
        material: MaterialKind,
    },
    /// Mine (apply damage toward destruction) the block at `coord`.
    MineBlock {
        /// Where to mine.
        coord: Coord,
        /// Damage to apply this tick.
        damage: u32,
    },
    /// Fire an arrow from `origin` toward `direction` at `speed`.
    FireArrow {
        /// World-space origin.
        origin: Vec2,
        /// Normalized aim direction.
        direction: Vec2,
        /// Initial speed in world units per second.
        speed: f32,
    },
}

/// Everything a tick emits for a renderer/adapter to consume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A block was destroyed, optionally dropping an item.
    BlockDestroyed {
        /// Where it was destroyed.
        coord: Coord,
        /// What kind was destroyed.
        kind: MaterialKind,
    },
    /// An entity died.
    EntityDied {
        /// Which entity.
        id: EntityId,
    },
    /// The portal took damage.
    PortalDamaged {
        /// Remaining health after the hit.
        remaining_health: u32,
    },
    /// The portal was destroyed (game over).
    PortalDestroyed,
    /// The wave scheduler transitioned phase.
    WavePhaseChanged {
        /// The wave index the phase change pertains to.
        wave_index: u32,
    },
    /// The final wave was cleared (victory).
    AllWavesCleared,
}

/// Bundles one tick's external input: the commands to apply and the elapsed
/// time to advance by.
#[derive(Clone, Debug, Default)]
pub struct TickInput {
    /// Commands to apply before advancing the tick, in order.
    pub commands: Vec<Command>,
    /// Elapsed seconds since the previous tick.
    pub delta_seconds: f32,
}
