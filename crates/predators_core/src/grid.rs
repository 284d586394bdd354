//! Bounded square coordinate space and the per-tick display grid.

use predators_data::{CellCode, Position};
use serde::{Deserialize, Serialize};

/// Bounds of the `size × size` world. Holds no entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: u16,
}

impl Grid {
    pub fn new(size: u16) -> Self {
        Self { size }
    }

    #[inline]
    pub fn size(&self) -> u16 {
        self.size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        let size = i32::from(self.size);
        (0..size).contains(&pos.x) && (0..size).contains(&pos.y)
    }

    /// Row-major index, `None` outside the grid.
    #[inline]
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * usize::from(self.size) + pos.x as usize)
    }

    /// In-bounds 8-connected neighbours of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().filter(move |p| self.contains(*p))
    }
}

/// Read-only category view for renderers, rebuilt in full every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGrid {
    pub size: u16,
    pub cells: Vec<CellCode>,
}

impl DisplayGrid {
    pub fn new(size: u16) -> Self {
        let n = usize::from(size) * usize::from(size);
        Self {
            size,
            cells: vec![CellCode::Empty; n],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(CellCode::Empty);
    }

    /// Writes `code` at `pos`; positions outside the grid are skipped.
    pub fn stamp(&mut self, pos: Position, code: CellCode) {
        if let Some(idx) = Grid::new(self.size).index(pos) {
            self.cells[idx] = code;
        }
    }

    pub fn get(&self, x: i32, y: i32) -> CellCode {
        Grid::new(self.size)
            .index(Position::new(x, y))
            .map_or(CellCode::Empty, |idx| self.cells[idx])
    }

    pub fn count(&self, code: CellCode) -> usize {
        self.cells.iter().filter(|c| **c == code).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellCode]> {
        self.cells.chunks(usize::from(self.size).max(1))
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + usize::from(self.size));
        for row in self.rows() {
            out.extend(row.iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(10);
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(9, 9)));
        assert!(!grid.contains(Position::new(10, 3)));
        assert!(!grid.contains(Position::new(-1, 3)));
        assert_eq!(grid.index(Position::new(3, 2)), Some(23));
        assert_eq!(grid.index(Position::new(3, 10)), None);
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let grid = Grid::new(5);
        assert_eq!(grid.neighbors(Position::new(0, 0)).count(), 3);
        assert_eq!(grid.neighbors(Position::new(2, 2)).count(), 8);
    }

    #[test]
    fn test_display_stamp_ignores_out_of_bounds() {
        let mut display = DisplayGrid::new(4);
        display.stamp(Position::new(1, 2), CellCode::Food);
        display.stamp(Position::new(4, 0), CellCode::Egg);
        assert_eq!(display.get(1, 2), CellCode::Food);
        assert_eq!(display.count(CellCode::Egg), 0);
        assert_eq!(display.to_ascii().lines().nth(2), Some(".*.."));
    }
}
