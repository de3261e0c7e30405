#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity integration: gravity, buoyancy, rope climbing, and the call into
//! `systems/collision` to resolve the resulting displacement against the
//! grid.

use glam::Vec2;

use holdfast_core::{Entity, Grid, Intent, PhysicsConfig, RecoveredErrorTally, SimError};
use holdfast_system_collision::resolve_movement;

/// Advances `entity` by `dt` seconds under `intent`, mutating its position,
/// velocity, and grounded/submerged flags in place.
///
/// `dt` is clamped to `config.max_delta_time`, guarding against a stalled
/// host producing a catastrophic single step.
pub fn step(
    grid: &Grid,
    entity: &mut Entity,
    intent: Intent,
    config: &PhysicsConfig,
    dt: f32,
    tally: &mut RecoveredErrorTally,
) -> Result<(), SimError> {
    let dt = dt.clamp(0.0, config.max_delta_time);

    if let Intent::ClimbRope { direction } = intent {
        entity.velocity = Vec2::new(0.0, direction.clamp(-1.0, 1.0) * config.rope_climb_speed);
    } else {
        apply_intent_horizontal(entity, intent, config);
        apply_gravity(entity, config, dt);
    }

    let displacement = entity.velocity * dt;
    let resolution = resolve_movement(grid, entity.aabb(), entity.velocity, displacement, config, tally)?;

    entity.position = resolution.position;
    entity.velocity = resolution.velocity;
    entity.grounded = resolution.grounded;
    entity.submerged = resolution.submerged;

    Ok(())
}

fn apply_intent_horizontal(entity: &mut Entity, intent: Intent, config: &PhysicsConfig) {
    match intent {
        Intent::MoveToward { target, speed } => {
            let toward = target - entity.aabb().center();
            entity.velocity.x = if toward.x.abs() < f32::EPSILON {
                0.0
            } else {
                toward.x.signum() * speed
            };
        }
        Intent::Jump => {
            if entity.grounded {
                entity.velocity.y = -config.jump_speed;
            }
        }
        Intent::Idle | Intent::ClimbRope { .. } | Intent::AttackEntity(_) => {}
    }
}

fn apply_gravity(entity: &mut Entity, config: &PhysicsConfig, dt: f32) {
    let accel = if entity.submerged {
        config.buoyant_gravity
    } else {
        config.gravity
    };
    entity.velocity.y += accel * dt;

    if entity.submerged {
        let damping = config.water_damping.powf(dt);
        entity.velocity *= damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdfast_core::{Coord, EntityKind, MaterialKind, RecoveredErrorTally};

    fn floor_grid() -> Grid {
        let mut grid = Grid::new(10, 10);
        let mut tally = RecoveredErrorTally::default();
        for col in 0..10 {
            grid.set(Coord::new(col, 9), holdfast_core::Cell::new_material(MaterialKind::Stone, false), &mut tally);
        }
        grid
    }

    fn entity_at(x: f32, y: f32) -> Entity {
        Entity {
            kind: EntityKind::SeekCenter,
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: Vec2::new(1.0, 1.0),
            hp: 20,
            max_hp: 20,
            grounded: false,
            submerged: false,
            seconds_out_of_water: 0.0,
        }
    }

    #[test]
    fn jump_only_applies_while_grounded() {
        let grid = floor_grid();
        let mut tally = RecoveredErrorTally::default();
        let config = PhysicsConfig::default();
        let mut entity = entity_at(4.0, 8.0);
        entity.grounded = false;
        step(&grid, &mut entity, Intent::Jump, &config, 0.016, &mut tally).unwrap();
        assert!(entity.velocity.y >= 0.0);
    }

    #[test]
    fn dt_is_clamped_to_configured_maximum() {
        let grid = floor_grid();
        let mut tally = RecoveredErrorTally::default();
        let config = PhysicsConfig::default();
        let mut entity = entity_at(4.0, 0.0);
        step(&grid, &mut entity, Intent::Idle, &config, 10.0, &mut tally).unwrap();
        assert!(entity.velocity.y <= config.gravity * config.max_delta_time + 0.001);
    }

    #[test]
    fn submerged_entity_is_damped() {
        let mut grid = Grid::new(4, 4);
        let mut tally = RecoveredErrorTally::default();
        for col in 0..4 {
            grid.set(Coord::new(col, 0), holdfast_core::Cell::Water, &mut tally);
            grid.set(Coord::new(col, 1), holdfast_core::Cell::Water, &mut tally);
        }
        let config = PhysicsConfig::default();
        let mut entity = entity_at(1.0, 0.0);
        entity.velocity = Vec2::new(0.0, 5.0);
        step(&grid, &mut entity, Intent::Idle, &config, 0.1, &mut tally).unwrap();
        assert!(entity.velocity.y < 5.0 + config.gravity * 0.1);
    }
}
