use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Board extents as `(rows, cols)`.
pub type Size = (Coord, Coord);

/// A cell on the board, addressed by row and column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: Coord,
    pub col: Coord,
}

impl Position {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub const fn is_within(self, (rows, cols): Size) -> bool {
        self.row < rows && self.col < cols
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.col.into()]
    }
}

impl ToNdIndex for Size {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Every position of a `rows × cols` grid in row-major order.
pub fn iter_positions((rows, cols): Size) -> impl Iterator<Item = Position> {
    (0..rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Position) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Position) -> NeighborIter {
        let (rows, cols) = self.dim();
        // grids are always allocated from `Coord` extents
        NeighborIter::new(center, (rows as Coord, cols as Coord))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `center`, returning a value only when it remains in bounds.
fn apply_delta(center: Position, delta: (i8, i8), bounds: Size) -> Option<Position> {
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let row = center.row.checked_add_signed(d_row)?;
    if row >= rows {
        return None;
    }

    let col = center.col.checked_add_signed(d_col)?;
    if col >= cols {
        return None;
    }

    Some(Position::new(row, col))
}

/// Iterates the up to eight cells at Chebyshev distance 1 from a center, clipped to the grid.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Position,
    bounds: Size,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Position, bounds: Size) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(center: (Coord, Coord), bounds: Size) -> Vec<(Coord, Coord)> {
        let mut out: Vec<_> = NeighborIter::new(center.into(), bounds)
            .map(|pos| (pos.row, pos.col))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        assert_eq!(
            neighbors((1, 1), (3, 3)),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn corners_are_clipped() {
        assert_eq!(neighbors((0, 0), (5, 5)), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(neighbors((4, 4), (5, 5)), vec![(3, 3), (3, 4), (4, 3)]);
        assert_eq!(neighbors((0, 4), (5, 5)), vec![(0, 3), (1, 3), (1, 4)]);
        assert_eq!(neighbors((4, 0), (5, 5)), vec![(3, 0), (3, 1), (4, 1)]);
    }

    #[test]
    fn edges_are_clipped() {
        assert_eq!(
            neighbors((0, 2), (5, 5)),
            vec![(0, 1), (0, 3), (1, 1), (1, 2), (1, 3)]
        );
        assert_eq!(neighbors((2, 4), (5, 5)).len(), 5);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert!(neighbors((0, 0), (1, 1)).is_empty());
    }

    #[test]
    fn single_row_grid() {
        assert_eq!(neighbors((0, 1), (1, 4)), vec![(0, 0), (0, 2)]);
    }

    #[test]
    fn positions_cover_grid_in_row_major_order() {
        let all: Vec<_> = iter_positions((2, 3)).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Position::new(0, 0));
        assert_eq!(all[3], Position::new(1, 0));
        assert_eq!(all[5], Position::new(1, 2));
    }

    #[test]
    fn position_bounds() {
        assert!(Position::new(4, 4).is_within((5, 5)));
        assert!(!Position::new(5, 0).is_within((5, 5)));
        assert!(!Position::new(0, 5).is_within((5, 5)));
    }
}
