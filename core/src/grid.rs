//! The fixed-size tile grid.

use crate::cell::Cell;
use crate::coord::Coord;
use crate::error::RecoveredErrorTally;

/// A fixed-size, row-major grid of [`Cell`]s.
///
/// Storage is a flat `Vec` addressed by `row * width + column`.
/// Out-of-bounds reads return `None`; out-of-bounds writes are recoverable
/// and are counted rather than panicking.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of the given dimensions, filled with `Air`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::Air; len],
        }
    }

    /// Grid width in columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `coord` addresses a cell within bounds.
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.column() < self.width && coord.row() < self.height
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.row() as usize) * (self.width as usize) + coord.column() as usize)
        } else {
            None
        }
    }

    /// Reads the cell at `coord`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    /// Writes `cell` at `coord`. Out-of-bounds writes are silently dropped
    /// and counted against `tally`; the simulation keeps advancing rather
    /// than panicking.
    pub fn set(&mut self, coord: Coord, cell: Cell, tally: &mut RecoveredErrorTally) {
        match self.index(coord) {
            Some(i) => self.cells[i] = cell,
            None => tally.record_bounds_violation(),
        }
    }

    /// Mutable access to the cell at `coord`, or `None` if out of bounds.
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).map(move |i| &mut self.cells[i])
    }

    /// Whether the cell at `coord` blocks physics movement. Out-of-bounds
    /// coordinates are treated as solid (world edge acts as a wall).
    #[must_use]
    pub fn is_solid(&self, coord: Coord) -> bool {
        self.get(coord).map_or(true, Cell::is_solid_for_physics)
    }

    /// Whether the cell at `coord` is a rope.
    #[must_use]
    pub fn is_rope(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_rope)
    }

    /// Iterates over every coordinate and its cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let column = (i % self.width as usize) as u32;
            let row = (i / self.width as usize) as u32;
            (Coord::new(column, row), cell)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    #[test]
    fn new_grid_is_all_air() {
        let grid = Grid::new(4, 3);
        assert!(grid.iter().all(|(_, cell)| cell.is_air()));
    }

    #[test]
    fn out_of_bounds_write_is_counted_not_panicking() {
        let mut grid = Grid::new(2, 2);
        let mut tally = RecoveredErrorTally::default();
        grid.set(Coord::new(50, 50), Cell::Water, &mut tally);
        assert_eq!(tally.bounds_violations(), 1);
    }

    #[test]
    fn out_of_bounds_is_solid_for_world_edge() {
        let grid = Grid::new(2, 2);
        assert!(grid.is_solid(Coord::new(99, 99)));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut grid = Grid::new(2, 2);
        let mut tally = RecoveredErrorTally::default();
        let coord = Coord::new(1, 1);
        grid.set(coord, Cell::new_material(MaterialKind::Stone, true), &mut tally);
        assert_eq!(tally.bounds_violations(), 0);
        assert!(grid.get(coord).unwrap().is_solid_for_physics());
    }
}
