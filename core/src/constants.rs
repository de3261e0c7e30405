//! Per-kind entity baseline stats, resolved by table lookup the same way
//! [`crate::material::properties`] resolves per-material statics rather
//! than storing them per instance.

use glam::Vec2;

use crate::entity::EntityKind;

/// Baseline stats a freshly spawned entity of a given kind starts with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityBaseline {
    /// Starting/maximum hit points.
    pub max_hp: u32,
    /// AABB size in world units.
    pub size: Vec2,
    /// Desired movement speed in world units per second.
    pub move_speed: f32,
    /// Melee/collision damage dealt to the portal or player per contact.
    pub contact_damage: u32,
}

/// Resolves the baseline stats for `kind`. Panics for `Arrow`/`Item`, which
/// are not spawned through the creature/player baseline path.
#[must_use]
pub const fn entity_baseline(kind: EntityKind) -> EntityBaseline {
    match kind {
        EntityKind::Player => EntityBaseline {
            max_hp: 100,
            size: Vec2::new(0.8, 1.8),
            move_speed: 5.0,
            contact_damage: 0,
        },
        EntityKind::SeekCenter => EntityBaseline {
            max_hp: 20,
            size: Vec2::new(0.9, 0.9),
            move_speed: 2.2,
            contact_damage: 8,
        },
        EntityKind::ChasePlayer => EntityBaseline {
            max_hp: 30,
            size: Vec2::new(1.0, 1.2),
            move_speed: 3.1,
            contact_damage: 12,
        },
        EntityKind::Flop => EntityBaseline {
            max_hp: 15,
            size: Vec2::new(0.7, 0.5),
            move_speed: 1.0,
            contact_damage: 4,
        },
        EntityKind::Fish => EntityBaseline {
            max_hp: 12,
            size: Vec2::new(0.6, 0.4),
            move_speed: 2.6,
            contact_damage: 3,
        },
        EntityKind::Dunkleosteus => EntityBaseline {
            max_hp: 80,
            size: Vec2::new(2.4, 1.2),
            move_speed: 3.8,
            contact_damage: 25,
        },
        EntityKind::Arrow | EntityKind::Item { .. } => EntityBaseline {
            max_hp: 1,
            size: Vec2::new(0.2, 0.2),
            move_speed: 0.0,
            contact_damage: 0,
        },
    }
}

/// Out-of-water damage per second applied to aquatic creatures
/// (`EntityKind::is_aquatic`) stranded outside of water.
pub const AQUATIC_STRANDED_DAMAGE_PER_SECOND: f32 = 4.0;

/// Seconds a stranded aquatic creature can survive before the per-second
/// damage rule begins, giving brief splash-out grace.
pub const AQUATIC_STRANDED_GRACE_SECONDS: f32 = 1.5;

/// Gravity multiplier applied to arrows relative to `PhysicsConfig::gravity`.
pub const ARROW_GRAVITY_FACTOR: f32 = 0.35;

/// Melee attack range in world units for creature contact-damage checks.
pub const MELEE_CONTACT_RANGE: f32 = 0.15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_creature_kind_has_positive_hp() {
        for kind in [
            EntityKind::Player,
            EntityKind::SeekCenter,
            EntityKind::ChasePlayer,
            EntityKind::Flop,
            EntityKind::Fish,
            EntityKind::Dunkleosteus,
        ] {
            assert!(entity_baseline(kind).max_hp > 0);
        }
    }
}
