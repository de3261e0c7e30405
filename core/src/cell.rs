//! The grid cell sum-type.

use crate::material::{properties, ItemKind, MaterialKind};

/// A single grid cell.
///
/// `Air` and `Water` carry no per-instance state (they are conceptually
/// indestructible, `hp = +∞`), while `Material` carries the mutable
/// per-block fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    /// Open, fully light-transmissive space.
    Air,
    /// Non-solid, impassable-by-gravity fluid medium. Indestructible.
    Water,
    /// A destructible block.
    Material {
        /// The block's material kind.
        kind: MaterialKind,
        /// Current hit points; the block is destroyed when this reaches 0.
        hp: u32,
        /// Hit points this block was created with (its `kind`'s `max_hp`
        /// unless otherwise noted, e.g. growth).
        max_hp: u32,
        /// Whether a player (as opposed to world generation or aging) placed
        /// this block. Aging never changes this flag once set.
        player_placed: bool,
        /// Accumulated light level in `[0, 1]`, written by the lighting pass.
        light_level: f32,
        /// Whether `light_level` is at or above the lit threshold.
        lit: bool,
    },
}

impl Cell {
    /// Creates a freshly alive material cell at full health.
    #[must_use]
    pub fn new_material(kind: MaterialKind, player_placed: bool) -> Self {
        let max_hp = properties(kind).max_hp;
        Self::Material {
            kind,
            hp: max_hp,
            max_hp,
            player_placed,
            light_level: 0.0,
            lit: false,
        }
    }

    /// The material kind, if this is a `Material` cell.
    #[must_use]
    pub fn kind(&self) -> Option<MaterialKind> {
        match self {
            Self::Material { kind, .. } => Some(*kind),
            Self::Air | Self::Water => None,
        }
    }

    /// Whether this cell blocks physics movement.
    ///
    /// Wood is solid only when player-placed; wood grown by aging is
    /// natural growth and never blocks movement.
    #[must_use]
    pub fn is_solid_for_physics(&self) -> bool {
        match self {
            Self::Air | Self::Water => false,
            Self::Material {
                kind,
                player_placed,
                ..
            } => {
                let props = properties(*kind);
                if props.is_wood {
                    *player_placed
                } else {
                    props.solid_for_physics
                }
            }
        }
    }

    /// Whether a block may be placed resting on top of this cell.
    #[must_use]
    pub fn is_solid_for_placement_support(&self) -> bool {
        match self {
            Self::Air | Self::Water => false,
            Self::Material { kind, .. } => properties(*kind).solid_for_placement_support,
        }
    }

    /// Whether entities can climb this cell as a rope.
    #[must_use]
    pub fn is_rope(&self) -> bool {
        matches!(self, Self::Material { kind, .. } if properties(*kind).is_rope)
    }

    /// Whether this cell is water (fluid medium).
    #[must_use]
    pub fn is_water(&self) -> bool {
        matches!(self, Self::Water)
    }

    /// Whether this cell is air.
    #[must_use]
    pub fn is_air(&self) -> bool {
        matches!(self, Self::Air)
    }

    /// Whether the cell is `Air` or `Water` ("inert" for aging purposes).
    #[must_use]
    pub fn is_inert_for_aging(&self) -> bool {
        matches!(self, Self::Air | Self::Water)
    }

    /// Fraction of light power that passes through this cell.
    #[must_use]
    pub fn translucency(&self) -> f32 {
        match self {
            Self::Air => 1.0,
            Self::Water => 0.5,
            Self::Material { kind, .. } => properties(*kind).translucency,
        }
    }

    /// Whether this cell is lit (for cells without a `lit` field, `false`).
    #[must_use]
    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Material { lit: true, .. })
    }

    /// Current light level accumulator, `0.0` for `Air`/`Water`, which do not
    /// track it (they never gate an aging rule on `lit`).
    #[must_use]
    pub fn light_level(&self) -> f32 {
        match self {
            Self::Material { light_level, .. } => *light_level,
            Self::Air | Self::Water => 0.0,
        }
    }

    /// Resets the light accumulator to zero ahead of a lighting recompute.
    pub fn reset_light(&mut self, threshold: f32) {
        if let Self::Material {
            light_level, lit, ..
        } = self
        {
            *light_level = 0.0;
            *lit = *light_level >= threshold;
        }
    }

    /// Adds `power` to the light accumulator, saturating at 1.0, and updates
    /// `lit` against `threshold`.
    pub fn accumulate_light(&mut self, power: f32, threshold: f32) {
        if let Self::Material {
            light_level, lit, ..
        } = self
        {
            *light_level = (*light_level + power).clamp(0.0, 1.0);
            *lit = *light_level >= threshold;
        }
    }

    /// Applies damage, returning the item dropped if the block died.
    ///
    /// `Air`/`Water` are indestructible no-ops.
    #[must_use]
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        let Self::Material { kind, hp, .. } = self else {
            return DamageOutcome::NoEffect;
        };
        let kind = *kind;
        *hp = hp.saturating_sub(amount);
        if *hp == 0 {
            let dropped = properties(kind).dropped_item;
            *self = Self::Air;
            DamageOutcome::Destroyed { kind, dropped }
        } else {
            DamageOutcome::Damaged { remaining: *hp }
        }
    }

    /// Restores `amount` hit points, clamped to `max_hp`.
    pub fn restore_hp(&mut self, amount: u32) {
        if let Self::Material { hp, max_hp, .. } = self {
            *hp = (*hp + amount).min(*max_hp);
        }
    }
}

/// Result of applying damage to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The cell was `Air`/`Water` and could not be damaged.
    NoEffect,
    /// The block survived with `remaining` hit points.
    Damaged {
        /// Hit points left after damage.
        remaining: u32,
    },
    /// The block's hit points reached zero and it was replaced with `Air`.
    Destroyed {
        /// The kind that was destroyed.
        kind: MaterialKind,
        /// The item dropped, if the kind drops one.
        dropped: Option<ItemKind>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wood_solidity_depends_on_player_placed() {
        let natural = Cell::new_material(MaterialKind::Wood, false);
        let placed = Cell::new_material(MaterialKind::Wood, true);
        assert!(!natural.is_solid_for_physics());
        assert!(placed.is_solid_for_physics());
    }

    #[test]
    fn air_and_water_are_indestructible() {
        let mut air = Cell::Air;
        let mut water = Cell::Water;
        assert_eq!(air.apply_damage(1_000_000), DamageOutcome::NoEffect);
        assert_eq!(water.apply_damage(1_000_000), DamageOutcome::NoEffect);
    }

    #[test]
    fn damage_then_restore_round_trips() {
        let mut cell = Cell::new_material(MaterialKind::Stone, false);
        let before = cell;
        let outcome = cell.apply_damage(10);
        assert!(matches!(outcome, DamageOutcome::Damaged { .. }));
        cell.restore_hp(10);
        assert_eq!(cell, before);
    }

    #[test]
    fn lethal_damage_destroys_and_drops_item() {
        let mut cell = Cell::new_material(MaterialKind::Sand, false);
        let outcome = cell.apply_damage(1_000);
        assert!(matches!(
            outcome,
            DamageOutcome::Destroyed {
                kind: MaterialKind::Sand,
                dropped: Some(ItemKind::Material(MaterialKind::Sand)),
            }
        ));
        assert!(cell.is_air());
    }

    #[test]
    fn light_accumulates_and_saturates() {
        let mut cell = Cell::new_material(MaterialKind::Dirt, false);
        cell.reset_light(0.5);
        cell.accumulate_light(0.8, 0.5);
        assert_eq!(cell.light_level(), 0.8);
        assert!(cell.is_lit());
        cell.accumulate_light(0.8, 0.5);
        assert_eq!(cell.light_level(), 1.0);
    }
}
