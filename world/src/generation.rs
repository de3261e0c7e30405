//! Deterministic layered terrain generation.
//!
//! A cell is created once, when world generation sets it; this produces a
//! simple layered terrain seeded from the same base seed as everything
//! else, so a fixed seed reproduces identical terrain.

use holdfast_core::{Cell, Coord, DeterministicRng, Grid, MaterialKind, RecoveredErrorTally, WorldConfig};

/// Fraction of the grid height given to the open sky band at the top.
const SKY_BAND_FRACTION: f32 = 0.25;
/// Fraction of the grid height given to the surface band beneath the sky.
const SURFACE_BAND_FRACTION: f32 = 0.15;
/// Probability a surface-band dirt cell starts seeded with vegetation.
const SURFACE_VEGETATION_SEED_CHANCE: f64 = 0.12;
/// Probability any given deep-band cell is gravel rather than stone/rock.
const GRAVEL_POCKET_CHANCE: f64 = 0.08;
/// Probability a deep-band cell is the denser rock variant rather than
/// stone.
const ROCK_VS_STONE_CHANCE: f64 = 0.30;
/// Number of scattered water pool seeds placed in the deep band.
const WATER_POOL_COUNT: u32 = 6;
/// Radius (Chebyshev) of each scattered water pool.
const WATER_POOL_RADIUS: i64 = 3;

/// Generates a fresh grid for `config`, seeded by `config.seed` via a
/// labeled `"generation"` RNG stream so world generation never perturbs the
/// aging or general-purpose streams.
#[must_use]
pub fn generate(config: &WorldConfig) -> Grid {
    let mut grid = Grid::new(config.width, config.height);
    let mut tally = RecoveredErrorTally::default();
    let mut rng = DeterministicRng::new(config.seed, "generation");

    let sky_rows = (config.height as f32 * SKY_BAND_FRACTION) as u32;
    let surface_rows = sky_rows + (config.height as f32 * SURFACE_BAND_FRACTION) as u32;

    for row in 0..config.height {
        for col in 0..config.width {
            let coord = Coord::new(col, row);
            let cell = if row < sky_rows {
                Cell::Air
            } else if row < surface_rows {
                surface_cell(&mut rng)
            } else {
                deep_cell(&mut rng)
            };
            grid.set(coord, cell, &mut tally);
        }
    }

    scatter_water_pools(&mut grid, &mut rng, config, surface_rows, &mut tally);
    build_perimeter(&mut grid, config, &mut tally);

    grid
}

fn surface_cell(rng: &mut DeterministicRng) -> Cell {
    if rng.chance(SURFACE_VEGETATION_SEED_CHANCE) {
        Cell::new_material(MaterialKind::Vegetation, false)
    } else {
        Cell::new_material(MaterialKind::Dirt, false)
    }
}

fn deep_cell(rng: &mut DeterministicRng) -> Cell {
    if rng.chance(GRAVEL_POCKET_CHANCE) {
        Cell::new_material(MaterialKind::Gravel, false)
    } else if rng.chance(ROCK_VS_STONE_CHANCE) {
        Cell::new_material(MaterialKind::Rock, false)
    } else {
        Cell::new_material(MaterialKind::Stone, false)
    }
}

fn scatter_water_pools(grid: &mut Grid, rng: &mut DeterministicRng, config: &WorldConfig, surface_rows: u32, tally: &mut RecoveredErrorTally) {
    if config.width == 0 || config.height <= surface_rows {
        return;
    }
    for _ in 0..WATER_POOL_COUNT {
        let center_col = rng.uniform_u32(0, config.width);
        let center_row = rng.uniform_u32(surface_rows, config.height);
        let center = Coord::new(center_col, center_row);
        for dc in -WATER_POOL_RADIUS..=WATER_POOL_RADIUS {
            for dr in -WATER_POOL_RADIUS..=WATER_POOL_RADIUS {
                if dc * dc + dr * dr > WATER_POOL_RADIUS * WATER_POOL_RADIUS {
                    continue;
                }
                if let Some(coord) = center.offset(dc, dr) {
                    if grid.in_bounds(coord) {
                        grid.set(coord, Cell::Water, tally);
                    }
                }
            }
        }
    }
}

fn build_perimeter(grid: &mut Grid, config: &WorldConfig, tally: &mut RecoveredErrorTally) {
    for col in 0..config.width {
        grid.set(Coord::new(col, config.height.saturating_sub(1)), Cell::new_material(MaterialKind::Rock, false), tally);
    }
    for row in 0..config.height {
        grid.set(Coord::new(0, row), Cell::new_material(MaterialKind::Rock, false), tally);
        grid.set(Coord::new(config.width.saturating_sub(1), row), Cell::new_material(MaterialKind::Rock, false), tally);
    }
}
