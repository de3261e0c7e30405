//! Read-only view over a [`crate::World`] for adapters: grid/entity
//! snapshots, the drained change log, and wave status, without exposing
//! any mutation path outside `apply`/`tick`.

use holdfast_core::{ChangeRecord, Entity, EntityId, Grid, RecoveredErrorTally};
use holdfast_system_waves::WavePhase;

use crate::World;

/// A snapshot of wave progression a renderer can display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveInfo {
    /// The scheduler's current phase.
    pub phase: WavePhase,
    /// Current portal health.
    pub portal_health: u32,
    /// Portal maximum health.
    pub portal_max_health: u32,
}

impl World {
    /// The full grid, for a renderer to draw from.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Drains every cell-kind transition recorded since the last drain,
    /// sorted by row descending.
    pub fn drain_changes(&mut self) -> Vec<ChangeRecord> {
        self.change_log.drain_sorted_by_row_descending()
    }

    /// Every currently-alive entity, keyed by id.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(&id, entity)| (id, entity))
    }

    /// The player's entity id.
    #[must_use]
    pub const fn player_id(&self) -> EntityId {
        self.player_id
    }

    /// Current wave/portal status.
    #[must_use]
    pub fn wave_info(&self) -> WaveInfo {
        WaveInfo {
            phase: self.wave_scheduler.phase(),
            portal_health: self.portal.health(),
            portal_max_health: self.portal.max_health(),
        }
    }

    /// How many units the player currently holds of each material.
    #[must_use]
    pub fn player_inventory_count(&self, material: holdfast_core::MaterialKind) -> u32 {
        self.player_inventory.count(material)
    }

    /// Recoverable-error telemetry accumulated so far.
    #[must_use]
    pub const fn recovered_errors(&self) -> RecoveredErrorTally {
        self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdfast_core::{Cell, Config, MaterialKind, TickInput, WorldConfig};

    fn small_world() -> World {
        World::new(Config {
            world: WorldConfig { width: 40, height: 40, seed: 9 },
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn draining_changes_clears_the_log() {
        let mut world = small_world();
        let coord = holdfast_core::Coord::new(20, 35);
        world.grid.set(coord, Cell::new_material(MaterialKind::Stone, true), &mut world.tally);
        let _ = world.apply(holdfast_core::Command::MineBlock { coord, damage: 1_000 });
        let first_drain = world.drain_changes();
        assert!(!first_drain.is_empty());
        assert!(world.drain_changes().is_empty());
    }

    #[test]
    fn wave_info_starts_pregame_with_full_portal_health() {
        let world = small_world();
        let info = world.wave_info();
        assert_eq!(info.phase, WavePhase::PreGame);
        assert_eq!(info.portal_health, info.portal_max_health);
    }

    #[test]
    fn entities_iterator_includes_the_player() {
        let world = small_world();
        assert!(world.entities().any(|(id, _)| id == world.player_id()));
    }

    #[test]
    fn tick_advances_wave_scheduler_out_of_pregame() {
        let mut world = small_world();
        let _ = world.tick(TickInput { commands: Vec::new(), delta_seconds: 0.016 });
        assert_ne!(world.wave_info().phase, WavePhase::PreGame);
    }
}
