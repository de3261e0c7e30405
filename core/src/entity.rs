//! Dynamic actors: the player, creatures, projectiles, and item drops.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::material::MaterialKind;

/// Opaque, stable identifier for an [`Entity`], allocated in increasing
/// order so iteration over a `BTreeMap<EntityId, Entity>` is deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw id. Only the entity registry should call this.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Axis-aligned bounding box in continuous world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Aabb {
    /// Creates an AABB from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Translates the AABB by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether this AABB overlaps `other`.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.bottom() && self.bottom() > other.y
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// The distinct categories of dynamic actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityKind {
    /// The player-controlled actor.
    Player,
    /// A seek-the-portal-center land creature.
    SeekCenter,
    /// A player-chasing land creature.
    ChasePlayer,
    /// An out-of-water flopping creature, damaged while not submerged.
    Flop,
    /// An aquatic creature confined to water.
    Fish,
    /// A large aquatic predator.
    Dunkleosteus,
    /// A player- or enemy-fired arrow.
    Arrow,
    /// A collectible dropped block.
    Item {
        /// The material the item represents.
        material: MaterialKind,
    },
}

impl EntityKind {
    /// Whether this kind is a land/water creature subject to AI decisions
    /// (excludes `Player`, `Arrow`, `Item`).
    #[must_use]
    pub const fn is_creature(self) -> bool {
        matches!(
            self,
            Self::SeekCenter | Self::ChasePlayer | Self::Flop | Self::Fish | Self::Dunkleosteus
        )
    }

    /// Whether this kind only ever exists in water (confined swimmer).
    #[must_use]
    pub const fn is_aquatic(self) -> bool {
        matches!(self, Self::Fish | Self::Dunkleosteus)
    }
}

/// An AI-driven or externally-controlled actor's current intent for this
/// tick, produced by `systems/ai` and consumed by `systems/physics`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// No directed motion this tick.
    Idle,
    /// Move toward a world-space target at a desired speed.
    MoveToward {
        /// Target position in world units.
        target: Vec2,
        /// Desired speed in world units per second.
        speed: f32,
    },
    /// Jump (apply an instantaneous upward impulse) if grounded.
    Jump,
    /// Climb a rope (vertical-only movement, ignoring gravity).
    ClimbRope {
        /// Vertical direction, -1.0 up or 1.0 down.
        direction: f32,
    },
    /// Attack a specific entity in melee range.
    AttackEntity(EntityId),
}

/// A bounded count of collected materials, carried by the player only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<MaterialKind, u32>,
    capacity_per_kind: u32,
}

impl Inventory {
    /// Creates an inventory bounding each material kind's count at
    /// `capacity_per_kind`.
    #[must_use]
    pub fn new(capacity_per_kind: u32) -> Self {
        Self {
            counts: BTreeMap::new(),
            capacity_per_kind,
        }
    }

    /// Adds one unit of `material`, saturating at capacity. Returns whether
    /// it was actually added (false if already at capacity).
    pub fn add(&mut self, material: MaterialKind) -> bool {
        let entry = self.counts.entry(material).or_insert(0);
        if *entry >= self.capacity_per_kind {
            false
        } else {
            *entry += 1;
            true
        }
    }

    /// Removes one unit of `material` if present. Returns whether one was
    /// removed.
    pub fn remove(&mut self, material: MaterialKind) -> bool {
        if let Some(count) = self.counts.get_mut(&material) {
            if *count > 0 {
                *count -= 1;
                return true;
            }
        }
        false
    }

    /// Current count held for `material`.
    #[must_use]
    pub fn count(&self, material: MaterialKind) -> u32 {
        self.counts.get(&material).copied().unwrap_or(0)
    }
}

/// A dynamic actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    /// The actor's kind.
    pub kind: EntityKind,
    /// Current position, top-left of its AABB, in world units.
    pub position: Vec2,
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Half-extent size used to build the AABB at `position`.
    pub size: Vec2,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Whether the actor is currently in contact with solid ground below it.
    pub grounded: bool,
    /// Whether the actor's center cell is submerged in water.
    pub submerged: bool,
    /// Seconds the actor has spent out of water while `EntityKind::is_aquatic`.
    pub seconds_out_of_water: f32,
}

impl Entity {
    /// The entity's current AABB.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    /// Whether the entity is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage, saturating at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_intersects_detects_overlap() {
        let a = Aabb::new(0.0, 0.0, 2.0, 2.0);
        let b = Aabb::new(1.0, 1.0, 2.0, 2.0);
        let c = Aabb::new(5.0, 5.0, 1.0, 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn inventory_respects_capacity() {
        let mut inventory = Inventory::new(1);
        assert!(inventory.add(MaterialKind::Sand));
        assert!(!inventory.add(MaterialKind::Sand));
        assert_eq!(inventory.count(MaterialKind::Sand), 1);
    }

    #[test]
    fn inventory_remove_requires_stock() {
        let mut inventory = Inventory::new(2);
        assert!(!inventory.remove(MaterialKind::Dirt));
        inventory.add(MaterialKind::Dirt);
        assert!(inventory.remove(MaterialKind::Dirt));
        assert_eq!(inventory.count(MaterialKind::Dirt), 0);
    }

    #[test]
    fn aquatic_classification() {
        assert!(EntityKind::Fish.is_aquatic());
        assert!(!EntityKind::SeekCenter.is_aquatic());
    }
}
