#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Arrow ballistics: reduced-gravity flight, sticking into the first solid
//! block it touches, and dealing damage on intersecting an enemy (spec
//! §4.8 C8 `ProjectileSim`).

use glam::Vec2;

use holdfast_core::{Coord, Entity, EntityId, Grid, PhysicsConfig, ARROW_GRAVITY_FACTOR};

/// Damage an arrow deals to the first enemy it intersects.
const ARROW_DAMAGE: u32 = 15;

/// What happened to an arrow this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArrowOutcome {
    /// Still in flight.
    Flying,
    /// Embedded in a solid block; the arrow entity should stop moving.
    StuckInBlock {
        /// The block it stuck into.
        coord: Coord,
    },
    /// Struck an entity, which should take `damage`; the arrow should be
    /// removed.
    HitEntity {
        /// Which entity was hit.
        id: EntityId,
        /// Damage to apply to it.
        damage: u32,
    },
}

/// Advances an arrow entity by `dt` seconds: applies reduced gravity,
/// checks intersection against `targets` first (arrows prioritize hitting
/// flesh over embedding in terrain at the same position), then checks the
/// grid for a solid block to stick into.
pub fn step_arrow(grid: &Grid, arrow: &mut Entity, dt: f32, config: &PhysicsConfig, targets: &[(EntityId, Entity)]) -> ArrowOutcome {
    arrow.velocity.y += config.gravity * ARROW_GRAVITY_FACTOR * dt;
    let displacement = arrow.velocity * dt;
    let candidate_position = arrow.position + displacement;
    let candidate_aabb = holdfast_core::Aabb::new(candidate_position.x, candidate_position.y, arrow.size.x, arrow.size.y);

    for (id, target) in targets {
        if target.is_alive() && candidate_aabb.intersects(&target.aabb()) {
            return ArrowOutcome::HitEntity {
                id: *id,
                damage: ARROW_DAMAGE,
            };
        }
    }

    if candidate_position.x >= 0.0 && candidate_position.y >= 0.0 {
        let center = candidate_aabb.center();
        let coord = Coord::new(center.x as u32, center.y as u32);
        if grid.is_solid(coord) {
            arrow.velocity = Vec2::ZERO;
            return ArrowOutcome::StuckInBlock { coord };
        }
    }

    arrow.position = candidate_position;
    ArrowOutcome::Flying
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdfast_core::{Cell, EntityKind, MaterialKind, RecoveredErrorTally};

    fn arrow_at(x: f32, y: f32, velocity: Vec2) -> Entity {
        Entity {
            kind: EntityKind::Arrow,
            position: Vec2::new(x, y),
            velocity,
            size: Vec2::new(0.2, 0.2),
            hp: 1,
            max_hp: 1,
            grounded: false,
            submerged: false,
            seconds_out_of_water: 0.0,
        }
    }

    #[test]
    fn arrow_sticks_in_solid_block() {
        let mut grid = Grid::new(10, 10);
        let mut tally = RecoveredErrorTally::default();
        grid.set(Coord::new(5, 5), Cell::new_material(MaterialKind::Stone, true), &mut tally);
        let mut arrow = arrow_at(4.5, 5.1, Vec2::new(10.0, 0.0));
        let outcome = step_arrow(&grid, &mut arrow, 0.1, &PhysicsConfig::default(), &[]);
        assert!(matches!(outcome, ArrowOutcome::StuckInBlock { coord } if coord == Coord::new(5, 5)));
        assert_eq!(arrow.velocity, Vec2::ZERO);
    }

    #[test]
    fn arrow_hits_entity_before_checking_terrain() {
        let grid = Grid::new(10, 10);
        let mut arrow = arrow_at(1.0, 1.0, Vec2::new(5.0, 0.0));
        let target = Entity {
            kind: EntityKind::SeekCenter,
            position: Vec2::new(1.4, 1.0),
            velocity: Vec2::ZERO,
            size: Vec2::new(1.0, 1.0),
            hp: 20,
            max_hp: 20,
            grounded: true,
            submerged: false,
            seconds_out_of_water: 0.0,
        };
        let targets = [(EntityId::from_raw(7), target)];
        let outcome = step_arrow(&grid, &mut arrow, 0.1, &PhysicsConfig::default(), &targets);
        assert_eq!(outcome, ArrowOutcome::HitEntity { id: EntityId::from_raw(7), damage: ARROW_DAMAGE });
    }

    #[test]
    fn arrow_in_open_air_keeps_flying() {
        let grid = Grid::new(10, 10);
        let mut arrow = arrow_at(1.0, 1.0, Vec2::new(1.0, 0.0));
        let outcome = step_arrow(&grid, &mut arrow, 0.1, &PhysicsConfig::default(), &[]);
        assert_eq!(outcome, ArrowOutcome::Flying);
        assert!(arrow.position.x > 1.0);
    }
}
