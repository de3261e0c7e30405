#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity decision-making: each creature kind's movement goal, separation
//! from crowding neighbors, stuck-on-obstacle recovery, and the
//! out-of-water damage rule for confined aquatic creatures.

use glam::Vec2;

use holdfast_core::{
    DeterministicRng, Entity, EntityId, EntityKind, Intent, AQUATIC_STRANDED_DAMAGE_PER_SECOND,
    AQUATIC_STRANDED_GRACE_SECONDS,
};

/// Radius within which same-kind creatures push each other apart rather
/// than stacking.
const SEPARATION_RADIUS: f32 = 1.2;

/// Minimum speed magnitude below which a grounded creature is considered
/// stuck against an obstacle it was trying to walk through.
const STUCK_VELOCITY_EPSILON: f32 = 0.05;

/// Decides this tick's [`Intent`] for `entity`, given the player's position,
/// the portal's center, and every other entity (for separation).
pub fn decide_intent(
    self_id: EntityId,
    entity: &Entity,
    others: &[(EntityId, Entity)],
    player_position: Vec2,
    portal_center: Vec2,
    rng: &mut DeterministicRng,
) -> Intent {
    if !entity.kind.is_creature() {
        return Intent::Idle;
    }

    if let Some(recovery) = react_to_stuck(entity) {
        return recovery;
    }

    let primary_target = match entity.kind {
        EntityKind::SeekCenter => portal_center,
        EntityKind::ChasePlayer => player_position,
        EntityKind::Flop => flop_target(entity, rng),
        EntityKind::Fish | EntityKind::Dunkleosteus => aquatic_wander_target(entity, rng),
        EntityKind::Player | EntityKind::Arrow | EntityKind::Item { .. } => return Intent::Idle,
    };

    let separation = separation_force(self_id, entity, others);
    let target = primary_target + separation;
    let speed = holdfast_core::entity_baseline(entity.kind).move_speed;

    Intent::MoveToward { target, speed }
}

/// A grounded creature with near-zero velocity while it was just asked to
/// move is stuck against an obstacle too tall to step over; react by
/// jumping.
fn react_to_stuck(entity: &Entity) -> Option<Intent> {
    if entity.grounded && entity.velocity.length() < STUCK_VELOCITY_EPSILON && entity.kind != EntityKind::Flop {
        Some(Intent::Jump)
    } else {
        None
    }
}

fn flop_target(entity: &Entity, rng: &mut DeterministicRng) -> Vec2 {
    let jitter = Vec2::new(rng.uniform_f32(-1.0, 1.0), 0.0);
    entity.position + jitter
}

fn aquatic_wander_target(entity: &Entity, rng: &mut DeterministicRng) -> Vec2 {
    let jitter = Vec2::new(rng.uniform_f32(-3.0, 3.0), rng.uniform_f32(-2.0, 2.0));
    entity.position + jitter
}

/// Pushes `entity` away from same-kind neighbors within [`SEPARATION_RADIUS`],
/// summed and capped so a crowd never overwhelms the primary movement goal.
fn separation_force(self_id: EntityId, entity: &Entity, others: &[(EntityId, Entity)]) -> Vec2 {
    let mut push = Vec2::ZERO;
    for (other_id, other) in others {
        if *other_id == self_id || other.kind != entity.kind {
            continue;
        }
        let delta = entity.position - other.position;
        let distance = delta.length();
        if distance > 0.0 && distance < SEPARATION_RADIUS {
            push += delta.normalize() * (SEPARATION_RADIUS - distance);
        }
    }
    push.clamp_length_max(SEPARATION_RADIUS)
}

/// Applies per-second damage to an aquatic creature stranded outside water
/// beyond its grace period, advancing its out-of-water timer.
///
/// Resets the timer to zero (and applies no damage) once the creature is
/// submerged again.
pub fn apply_stranding(entity: &mut Entity, dt: f32) {
    if !entity.kind.is_aquatic() {
        return;
    }
    if entity.submerged {
        entity.seconds_out_of_water = 0.0;
        return;
    }
    entity.seconds_out_of_water += dt;
    if entity.seconds_out_of_water > AQUATIC_STRANDED_GRACE_SECONDS {
        let damage = (AQUATIC_STRANDED_DAMAGE_PER_SECOND * dt).round() as u32;
        entity.apply_damage(damage.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creature(kind: EntityKind) -> Entity {
        Entity {
            kind,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            size: Vec2::new(1.0, 1.0),
            hp: 20,
            max_hp: 20,
            grounded: true,
            submerged: false,
            seconds_out_of_water: 0.0,
        }
    }

    #[test]
    fn seek_center_targets_the_portal() {
        let entity = creature(EntityKind::SeekCenter);
        let mut entity = Entity {
            velocity: Vec2::new(1.0, 0.0),
            ..entity
        };
        entity.grounded = false;
        let mut rng = DeterministicRng::new(1, "ai");
        let intent = decide_intent(EntityId::from_raw(0), &entity, &[], Vec2::new(5.0, 5.0), Vec2::new(20.0, 20.0), &mut rng);
        match intent {
            Intent::MoveToward { target, .. } => assert_eq!(target, Vec2::new(20.0, 20.0)),
            other => panic!("expected MoveToward, got {other:?}"),
        }
    }

    #[test]
    fn stuck_grounded_creature_jumps() {
        let entity = creature(EntityKind::ChasePlayer);
        let mut rng = DeterministicRng::new(1, "ai");
        let intent = decide_intent(EntityId::from_raw(0), &entity, &[], Vec2::ZERO, Vec2::ZERO, &mut rng);
        assert_eq!(intent, Intent::Jump);
    }

    #[test]
    fn stranding_damage_only_applies_past_grace_period() {
        let mut fish = creature(EntityKind::Fish);
        apply_stranding(&mut fish, 0.5);
        assert_eq!(fish.hp, 20);
        apply_stranding(&mut fish, AQUATIC_STRANDED_GRACE_SECONDS);
        assert!(fish.hp < 20);
    }

    #[test]
    fn submersion_resets_stranding_timer() {
        let mut fish = creature(EntityKind::Fish);
        fish.seconds_out_of_water = 10.0;
        fish.submerged = true;
        apply_stranding(&mut fish, 1.0);
        assert_eq!(fish.seconds_out_of_water, 0.0);
    }

    #[test]
    fn separation_pushes_overlapping_same_kind_apart() {
        let mut a = creature(EntityKind::SeekCenter);
        a.grounded = false;
        a.velocity = Vec2::new(1.0, 0.0);
        let b = creature(EntityKind::SeekCenter);
        let others = [(EntityId::from_raw(2), b)];
        let mut rng = DeterministicRng::new(1, "ai");
        let intent = decide_intent(EntityId::from_raw(1), &a, &others, Vec2::ZERO, Vec2::new(10.0, 0.0), &mut rng);
        match intent {
            Intent::MoveToward { target, .. } => assert_ne!(target, Vec2::new(10.0, 0.0)),
            other => panic!("expected MoveToward, got {other:?}"),
        }
    }
}
