#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic lighting propagation: a moving sun source casts a fan of
//! rays DDA-marched through the grid, attenuated per cell by translucency.

use holdfast_core::{Coord, Grid, LightingConfig};

/// Recomputes every cell's accumulated light level from scratch for the sun
/// positioned at `sun_column`.
///
/// Lighting is not incremental: every pass resets all cells to zero and
/// re-accumulates from the sun's current position, so the same grid and sun
/// column always produce the same result regardless of prior state.
pub fn recompute(grid: &mut Grid, sun_column: u32, config: &LightingConfig) {
    reset_all(grid, config.min_light_threshold);

    let spread_degrees = 20.0_f32;
    let rays = config.sun_rays_per_position.max(1);
    for i in 0..rays {
        let t = if rays == 1 {
            0.5
        } else {
            i as f32 / (rays - 1) as f32
        };
        let angle_degrees = -spread_degrees + t * 2.0 * spread_degrees;
        let angle_radians = angle_degrees.to_radians();
        let direction = (angle_radians.sin(), angle_radians.cos());
        cast_ray(grid, sun_column, direction, config);
    }
}

fn reset_all(grid: &mut Grid, threshold: f32) {
    let (width, height) = (grid.width(), grid.height());
    for row in 0..height {
        for col in 0..width {
            if let Some(cell) = grid.get_mut(Coord::new(col, row)) {
                cell.reset_light(threshold);
            }
        }
    }
}

/// Marches one ray from `(sun_column, 0)` in `direction` (dx, dy both in
/// `[-1, 1]`, not necessarily normalized to unit length) using a DDA
/// step, attenuating `power` by each traversed cell's translucency and
/// accumulating the remainder onto that cell, until `power` falls under
/// `config.min_light_threshold` or the ray exceeds
/// `config.max_light_ray_length_blocks`.
fn cast_ray(grid: &mut Grid, sun_column: u32, direction: (f32, f32), config: &LightingConfig) {
    let (dx, dy) = direction;
    let len = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
    let (dx, dy) = (dx / len, dy / len);

    let mut power = config.initial_light_ray_power;
    let mut x = sun_column as f32 + 0.5;
    let mut y = 0.0_f32;

    for _ in 0..config.max_light_ray_length_blocks {
        if power < config.min_light_threshold {
            break;
        }
        if x < 0.0 || y < 0.0 {
            break;
        }
        let coord = Coord::new(x as u32, y as u32);
        let Some(cell) = grid.get_mut(coord) else {
            break;
        };
        cell.accumulate_light(power, config.min_light_threshold);
        power *= cell.translucency().max(0.0);

        x += dx;
        y += dy;
    }
}

/// Advances the sun's column position by `config.sun_movement_step_columns`,
/// wrapping around `grid_width`.
#[must_use]
pub fn advance_sun_column(current: u32, grid_width: u32, config: &LightingConfig) -> u32 {
    if grid_width == 0 {
        return 0;
    }
    (current + config.sun_movement_step_columns) % grid_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdfast_core::MaterialKind;

    #[test]
    fn open_air_column_stays_fully_lit_near_the_top() {
        let mut grid = Grid::new(5, 20);
        let config = LightingConfig::default();
        recompute(&mut grid, 2, &config);
        let top = grid.get(Coord::new(2, 0)).unwrap();
        assert!(top.light_level() > 0.0);
    }

    #[test]
    fn opaque_roof_shadows_cells_beneath_it() {
        let mut grid = Grid::new(5, 20);
        let mut tally = holdfast_core::RecoveredErrorTally::default();
        for col in 0..5 {
            grid.set(Coord::new(col, 3), holdfast_core::Cell::new_material(MaterialKind::Rock, true), &mut tally);
        }
        let config = LightingConfig::default();
        recompute(&mut grid, 2, &config);
        let deep = grid.get(Coord::new(2, 10)).unwrap();
        assert!(deep.light_level() < config.min_light_threshold);
    }

    #[test]
    fn sun_column_wraps_around_grid_width() {
        let config = LightingConfig {
            sun_movement_step_columns: 3,
            ..LightingConfig::default()
        };
        assert_eq!(advance_sun_column(8, 10, &config), 1);
    }

    #[test]
    fn recompute_is_deterministic_across_repeated_passes() {
        let mut grid_a = Grid::new(6, 10);
        let mut grid_b = Grid::new(6, 10);
        let config = LightingConfig::default();
        recompute(&mut grid_a, 3, &config);
        recompute(&mut grid_b, 3, &config);
        for row in 0..10 {
            for col in 0..6 {
                let coord = Coord::new(col, row);
                assert_eq!(
                    grid_a.get(coord).unwrap().light_level(),
                    grid_b.get(coord).unwrap().light_level()
                );
            }
        }
    }
}
