//! Rule engine for single-player Minesweeper.
//!
//! [`Board`] owns the whole game: mine placement (lazy and seeded, or supplied up front), opened and flagged
//! cells, and win/loss detection. Rendering, input and persistence live in the caller.

use std::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn size(&self) -> Size {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Where the mines are. Before placement this is simply an all-clear mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn empty(size: Size) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    /// Builds a layout from explicit mine positions; repeated positions count once.
    pub fn from_positions<I>(size: Size, positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        GameConfig::new_unchecked(size.0, size.1, 0).validate()?;

        let mut layout = Self::empty(size);
        for pos in positions {
            let pos = layout.validate_position(pos)?;
            layout.place_mine(pos);
        }
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        let (rows, cols) = self.size();
        GameConfig::new_unchecked(rows, cols, self.mine_count)
    }

    pub fn validate_position(&self, pos: Position) -> Result<Position> {
        if pos.is_within(self.size()) {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Size {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, pos: Position) -> bool {
        self[pos]
    }

    /// Marks `pos` as mined, returning `false` if it already was.
    pub(crate) fn place_mine(&mut self, pos: Position) -> bool {
        if self[pos] {
            return false;
        }
        self[pos] = true;
        self.mine_count += 1;
        true
    }

    pub fn adjacent_mine_count(&self, pos: Position) -> u8 {
        let mut count = 0;
        for neighbor in self.mine_mask.iter_neighbors(pos) {
            if self[neighbor] {
                count += 1;
            }
        }
        count
    }

    /// Mined positions in row-major order.
    pub fn iter_mines(&self) -> impl Iterator<Item = Position> + '_ {
        iter_positions(self.size()).filter(move |&pos| self[pos])
    }

    pub(crate) fn iter_neighbors(&self, pos: Position) -> NeighborIter {
        self.mine_mask.iter_neighbors(pos)
    }
}

impl Index<Position> for MineLayout {
    type Output = bool;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.mine_mask[pos.to_nd_index()]
    }
}

impl IndexMut<Position> for MineLayout {
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        &mut self.mine_mask[pos.to_nd_index()]
    }
}

/// Result of [`Board::open`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenOutcome {
    /// A safe cell was opened; carries its neighbor-mine count.
    Cell(u8),
    /// The cell is flagged and was left untouched.
    FlaggedCell,
    /// The cell held a mine, the game is lost.
    Mine,
}

impl OpenOutcome {
    pub const fn neighbor_mines(self) -> Option<u8> {
        match self {
            Self::Cell(count) => Some(count),
            Self::FlaggedCell | Self::Mine => None,
        }
    }
}

/// What a presentation layer should draw for a cell, see [`Board::get`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayOutcome {
    OpenedCell(u8),
    Cell,
    FlaggedCell,
    Mine,
}

impl DisplayOutcome {
    pub const fn neighbor_mines(self) -> Option<u8> {
        match self {
            Self::OpenedCell(count) => Some(count),
            Self::Cell | Self::FlaggedCell | Self::Mine => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_grid() {
        assert_eq!(GameConfig::new(0, 5, 0), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new(5, 0, 0), Err(GameError::InvalidSize));
    }

    #[test]
    fn config_rejects_more_mines_than_cells() {
        assert_eq!(GameConfig::new(3, 3, 10), Err(GameError::TooManyMines));
        assert!(GameConfig::new(3, 3, 9).is_ok());
        assert!(GameConfig::new(3, 3, 0).is_ok());
    }

    #[test]
    fn config_cell_counts() {
        let config = GameConfig::new(4, 5, 3).unwrap();
        assert_eq!(config.total_cells(), 20);
        assert_eq!(config.safe_cells(), 17);
        assert_eq!(config.size(), (4, 5));
    }

    #[test]
    fn layout_collapses_duplicate_positions() {
        let positions = [(0, 0), (1, 2), (0, 0)].map(|(row, col)| Position::new(row, col));
        let layout = MineLayout::from_positions((5, 5), positions).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.game_config(), GameConfig::new_unchecked(5, 5, 2));
    }

    #[test]
    fn layout_rejects_mine_outside_grid() {
        let positions = [Position::new(5, 0)];
        assert_eq!(
            MineLayout::from_positions((5, 5), positions),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn layout_counts_adjacent_mines() {
        let positions = [(0, 0), (1, 2), (3, 4), (2, 0)].map(|(row, col)| Position::new(row, col));
        let layout = MineLayout::from_positions((5, 5), positions).unwrap();

        assert_eq!(layout.adjacent_mine_count(Position::new(0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count(Position::new(1, 1)), 3);
        assert_eq!(layout.adjacent_mine_count(Position::new(4, 0)), 0);
        assert_eq!(layout.adjacent_mine_count(Position::new(4, 4)), 1);
    }

    #[test]
    fn layout_iterates_mines_in_order() {
        let positions = [(3, 4), (0, 0), (2, 0)].map(|(row, col)| Position::new(row, col));
        let layout = MineLayout::from_positions((5, 5), positions).unwrap();

        let mines: Vec<_> = layout.iter_mines().collect();
        assert_eq!(
            mines,
            vec![Position::new(0, 0), Position::new(2, 0), Position::new(3, 4)]
        );
    }

    #[test]
    fn outcome_payloads() {
        assert_eq!(OpenOutcome::Cell(3).neighbor_mines(), Some(3));
        assert_eq!(OpenOutcome::Mine.neighbor_mines(), None);
        assert_eq!(DisplayOutcome::OpenedCell(0).neighbor_mines(), Some(0));
        assert_eq!(DisplayOutcome::FlaggedCell.neighbor_mines(), None);
    }
}
