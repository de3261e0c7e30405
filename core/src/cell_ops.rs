//! Pure neighbor-query helpers over a [`Grid`].

use crate::cell::Cell;
use crate::coord::Coord;
use crate::grid::Grid;
use crate::material::MaterialKind;

/// The four orthogonal neighbor cells of `coord`, in N/E/S/W order. Missing
/// (out-of-bounds) neighbors are omitted.
pub fn orthogonal_neighbors(grid: &Grid, coord: Coord) -> Vec<(Coord, &Cell)> {
    coord
        .von_neumann_neighbors()
        .into_iter()
        .flatten()
        .filter_map(|c| grid.get(c).map(|cell| (c, cell)))
        .collect()
}

/// The eight Moore-neighborhood cells of `coord`. Missing neighbors are
/// omitted.
pub fn moore_neighbors(grid: &Grid, coord: Coord) -> Vec<(Coord, &Cell)> {
    coord
        .moore_neighbors()
        .into_iter()
        .flatten()
        .filter_map(|c| grid.get(c).map(|cell| (c, cell)))
        .collect()
}

/// Whether `coord` has at least one orthogonal neighbor that is `Air` or
/// `Water` (i.e. the cell is exposed to the open).
#[must_use]
pub fn exposed_to_open(grid: &Grid, coord: Coord) -> bool {
    orthogonal_neighbors(grid, coord)
        .iter()
        .any(|(_, cell)| cell.is_inert_for_aging())
}

/// Whether `coord` has at least one orthogonal neighbor holding a block of
/// `kind`.
#[must_use]
pub fn exposed_to(grid: &Grid, coord: Coord, kind: MaterialKind) -> bool {
    orthogonal_neighbors(grid, coord)
        .iter()
        .any(|(_, cell)| cell.kind() == Some(kind))
}

/// Counts orthogonal neighbors matching `predicate`.
pub fn count_orthogonal_neighbors(grid: &Grid, coord: Coord, predicate: impl Fn(&Cell) -> bool) -> usize {
    orthogonal_neighbors(grid, coord)
        .iter()
        .filter(|(_, cell)| predicate(cell))
        .count()
}

/// Counts Moore neighbors matching `predicate`.
pub fn count_moore_neighbors(grid: &Grid, coord: Coord, predicate: impl Fn(&Cell) -> bool) -> usize {
    moore_neighbors(grid, coord)
        .iter()
        .filter(|(_, cell)| predicate(cell))
        .count()
}

/// Length of the contiguous run of cells of the same `kind` extending
/// straight downward from `coord` (inclusive of `coord` itself), capped at
/// `max_depth`. Used by tree formation's "scan downward to find the ground"
/// rule.
#[must_use]
pub fn contiguous_run_downward(grid: &Grid, coord: Coord, kind: MaterialKind, max_depth: u32) -> u32 {
    let mut depth = 0;
    let mut cursor = Some(coord);
    while depth < max_depth {
        let Some(here) = cursor else { break };
        match grid.get(here).and_then(Cell::kind) {
            Some(found) if found == kind => {
                depth += 1;
                cursor = here.offset(0, 1);
            }
            _ => break,
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposed_to_open_detects_adjacent_air() {
        let grid = Grid::new(3, 3);
        assert!(exposed_to_open(&grid, Coord::new(1, 1)));
    }

    #[test]
    fn exposed_to_open_false_when_fully_enclosed() {
        let mut grid = Grid::new(3, 3);
        let mut tally = crate::error::RecoveredErrorTally::default();
        for col in 0..3 {
            for row in 0..3 {
                let coord = Coord::new(col, row);
                if coord != Coord::new(1, 1) {
                    grid.set(coord, Cell::new_material(MaterialKind::Stone, false), &mut tally);
                }
            }
        }
        assert!(!exposed_to_open(&grid, Coord::new(1, 1)));
    }

    #[test]
    fn contiguous_run_stops_at_different_kind() {
        let mut grid = Grid::new(1, 5);
        let mut tally = crate::error::RecoveredErrorTally::default();
        grid.set(Coord::new(0, 0), Cell::new_material(MaterialKind::Dirt, false), &mut tally);
        grid.set(Coord::new(0, 1), Cell::new_material(MaterialKind::Dirt, false), &mut tally);
        grid.set(Coord::new(0, 2), Cell::new_material(MaterialKind::Stone, false), &mut tally);
        assert_eq!(contiguous_run_downward(&grid, Coord::new(0, 0), MaterialKind::Dirt, 6), 2);
    }
}
