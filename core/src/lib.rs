#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Holdfast simulation: grid/cell data
//! model, entities, commands/events, configuration, error telemetry, and
//! deterministic RNG stream derivation. `systems/*` crates depend only on
//! this crate so they can mutate shared state without depending on `world`.

mod cell;
mod cell_ops;
mod changelog;
mod command;
mod config;
mod constants;
mod coord;
mod entity;
mod error;
mod grid;
mod material;
mod portal;
mod rng;

pub use cell::{Cell, DamageOutcome};
pub use cell_ops::{
    contiguous_run_downward, count_moore_neighbors, count_orthogonal_neighbors, exposed_to, exposed_to_open,
    moore_neighbors, orthogonal_neighbors,
};
pub use changelog::{ChangeLog, ChangeRecord};
pub use command::{Command, Event, TickInput};
pub use config::{AgingConfig, Config, LightingConfig, PhysicsConfig, WaveConfig, WorldConfig};
pub use constants::{entity_baseline, EntityBaseline, AQUATIC_STRANDED_DAMAGE_PER_SECOND, AQUATIC_STRANDED_GRACE_SECONDS, ARROW_GRAVITY_FACTOR, MELEE_CONTACT_RANGE};
pub use coord::Coord;
pub use entity::{Aabb, Entity, EntityId, EntityKind, Intent, Inventory};
pub use error::{RecoveredErrorTally, SimError};
pub use grid::Grid;
pub use material::{properties, ItemKind, MaterialKind, MaterialProperties};
pub use portal::Portal;
pub use rng::{derive_labeled_seed, DeterministicRng};

/// Canonical banner emitted when the simulation boots.
pub const WELCOME_BANNER: &str = "Holdfast simulation core online.";
