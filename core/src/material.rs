//! Per-kind material properties, resolved by table lookup rather than stored
//! on every cell.

use serde::Deserialize;

/// The kind of a [`crate::Cell::Material`] block.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Loose granular earth; falls toward dirt or gravel with age.
    Sand,
    /// Fertile earth; grows vegetation when lit.
    Dirt,
    /// Living surface growth; decays in darkness, forms trees when dense.
    Vegetation,
    /// Common subsurface rock; occasionally compresses into diamond.
    Stone,
    /// Hard deep rock, denser than stone.
    Rock,
    /// Loose rock fragments.
    Gravel,
    /// Tree trunk/canopy material, grown by aging or placed by the player.
    Wood,
    /// Refined ore, player-placed only.
    Metal,
    /// Remains dropped by defeated creatures.
    Bone,
    /// Climbable fiber, never solid for physics.
    Rope,
    /// Rare compressed stone.
    Diamond,
}

impl MaterialKind {
    /// All material kinds, in declaration order (also the aging rule table's
    /// default scan order).
    pub const ALL: [Self; 11] = [
        Self::Sand,
        Self::Dirt,
        Self::Vegetation,
        Self::Stone,
        Self::Rock,
        Self::Gravel,
        Self::Wood,
        Self::Metal,
        Self::Bone,
        Self::Rope,
        Self::Diamond,
    ];
}

/// Item kind dropped when a block is destroyed or an entity dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A dropped material block, collectible and placeable again.
    Material(MaterialKind),
}

/// Static properties shared by every cell of a given [`MaterialKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialProperties {
    /// Hit points a freshly created block of this kind starts with.
    pub max_hp: u32,
    /// Display color, `(r, g, b)`.
    pub color: (u8, u8, u8),
    /// Fraction of light power that passes through a cell of this kind,
    /// `0.0` opaque .. `1.0` fully transparent.
    pub translucency: f32,
    /// Whether this kind blocks entity movement, baseline value — Wood
    /// overrides this per-cell based on `player_placed` (see
    /// [`crate::Cell::is_solid_for_physics`]).
    pub solid_for_physics: bool,
    /// Whether a block may be placed atop this kind (support check for
    /// player placement).
    pub solid_for_placement_support: bool,
    /// Whether entities can climb this kind.
    pub is_rope: bool,
    /// Whether this kind is subject to the vegetation decay/growth rules.
    pub is_vegetation: bool,
    /// Whether this kind is wood (for the conditional solidity rule).
    pub is_wood: bool,
    /// Item dropped when a block of this kind is destroyed, if any.
    pub dropped_item: Option<ItemKind>,
    /// Whether the player may place this kind directly.
    pub placeable_by_player: bool,
}

/// Resolves the static properties of a material kind.
#[must_use]
pub const fn properties(kind: MaterialKind) -> MaterialProperties {
    use MaterialKind::{Bone, Diamond, Dirt, Gravel, Metal, Rock, Rope, Sand, Stone, Vegetation, Wood};
    match kind {
        MaterialKind::Sand => MaterialProperties {
            max_hp: 20,
            color: (0xd9, 0xc1, 0x7a),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Sand)),
            placeable_by_player: true,
        },
        Dirt => MaterialProperties {
            max_hp: 30,
            color: (0x6b, 0x45, 0x26),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Dirt)),
            placeable_by_player: true,
        },
        Vegetation => MaterialProperties {
            max_hp: 5,
            color: (0x3d, 0x8b, 0x37),
            translucency: 0.4,
            solid_for_physics: false,
            solid_for_placement_support: false,
            is_rope: false,
            is_vegetation: true,
            is_wood: false,
            dropped_item: None,
            placeable_by_player: false,
        },
        Stone => MaterialProperties {
            max_hp: 60,
            color: (0x8a, 0x8a, 0x8a),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Stone)),
            placeable_by_player: true,
        },
        Rock => MaterialProperties {
            max_hp: 120,
            color: (0x57, 0x57, 0x5c),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Rock)),
            placeable_by_player: true,
        },
        Gravel => MaterialProperties {
            max_hp: 15,
            color: (0x9b, 0x93, 0x88),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Gravel)),
            placeable_by_player: true,
        },
        Wood => MaterialProperties {
            max_hp: 40,
            color: (0x8a, 0x5a, 0x2b),
            translucency: 0.1,
            solid_for_physics: false,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: true,
            dropped_item: Some(ItemKind::Material(Wood)),
            placeable_by_player: true,
        },
        Metal => MaterialProperties {
            max_hp: 200,
            color: (0xb0, 0xb4, 0xba),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Metal)),
            placeable_by_player: true,
        },
        Bone => MaterialProperties {
            max_hp: 25,
            color: (0xe8, 0xe2, 0xcf),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Bone)),
            placeable_by_player: false,
        },
        Rope => MaterialProperties {
            max_hp: 10,
            color: (0xc9, 0xa6, 0x66),
            translucency: 0.6,
            solid_for_physics: false,
            solid_for_placement_support: false,
            is_rope: true,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Rope)),
            placeable_by_player: true,
        },
        Diamond => MaterialProperties {
            max_hp: 300,
            color: (0x7f, 0xe6, 0xe6),
            translucency: 0.0,
            solid_for_physics: true,
            solid_for_placement_support: true,
            is_rope: false,
            is_vegetation: false,
            is_wood: false,
            dropped_item: Some(ItemKind::Material(Diamond)),
            placeable_by_player: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_positive_max_hp() {
        for kind in MaterialKind::ALL {
            assert!(properties(kind).max_hp > 0);
        }
    }

    #[test]
    fn rope_is_never_solid_for_physics() {
        assert!(!properties(MaterialKind::Rope).solid_for_physics);
        assert!(properties(MaterialKind::Rope).is_rope);
    }

    #[test]
    fn wood_baseline_is_non_solid_pending_player_placed_override() {
        assert!(!properties(MaterialKind::Wood).solid_for_physics);
        assert!(properties(MaterialKind::Wood).is_wood);
    }
}
