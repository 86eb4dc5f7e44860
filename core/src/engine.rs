use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No mines placed yet, they are generated on the first open.
    #[default]
    Created,
    Playing,
    GameOver,
    Won,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver | Self::Won)
    }
}

/// A single game of Minesweeper.
///
/// Mines are either supplied up front ([`Board::with_mines`]) or generated from a seed when the first cell is
/// opened, never on that cell unless every cell is a mine. Once the game is lost or won every mutating call fails with
/// [`GameError::AlreadyEnded`]; queries keep working.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    config: GameConfig,
    seed: u64,
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    opened_count: CellCount,
    flag_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Position>,
}

impl Board {
    /// Board with randomly placed mines, seeded from OS entropy.
    pub fn new(rows: Coord, cols: Coord, mine_count: CellCount) -> Result<Self> {
        Self::with_seed(rows, cols, mine_count, rand::random())
    }

    pub fn with_seed(rows: Coord, cols: Coord, mine_count: CellCount, seed: u64) -> Result<Self> {
        Self::from_config(GameConfig::new(rows, cols, mine_count)?, seed)
    }

    pub fn from_config(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::blank(config, seed))
    }

    fn blank(config: GameConfig, seed: u64) -> Self {
        let size = config.size();
        Self {
            config,
            seed,
            mine_layout: MineLayout::empty(size),
            cells: Array2::default(size.to_nd_index()),
            opened_count: 0,
            flag_count: 0,
            status: GameStatus::Created,
            triggered_mine: None,
        }
    }

    /// Board with a fixed set of mines; play starts immediately.
    pub fn with_mines<I>(rows: Coord, cols: Coord, mines: I) -> Result<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        Ok(Self::from_layout(MineLayout::from_positions((rows, cols), mines)?))
    }

    pub fn from_layout(mine_layout: MineLayout) -> Self {
        let mut board = Self::blank(mine_layout.game_config(), 0);
        board.mine_layout = mine_layout;
        board.status = GameStatus::Playing;
        board
    }

    /// Checks that the grids, counters and status agree with each other.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        let size = self.config.size();
        if self.mine_layout.size() != size || self.cells.dim() != (usize::from(size.0), usize::from(size.1)) {
            return Err(GameError::InvalidBoardShape);
        }
        if self.mine_layout.iter_mines().count() != usize::from(self.mine_layout.mine_count()) {
            return Err(GameError::InvalidBoardShape);
        }
        if self.status != GameStatus::Created && self.mine_layout.mine_count() != self.config.mines {
            return Err(GameError::InvalidBoardShape);
        }

        let opened = self.cells.iter().filter(|cell| cell.is_opened()).count();
        let flagged = self.cells.iter().filter(|cell| cell.is_flagged()).count();
        if opened != usize::from(self.opened_count) || flagged != usize::from(self.flag_count) {
            return Err(GameError::InvalidBoardShape);
        }

        if let Some(pos) = self.triggered_mine {
            self.mine_layout.validate_position(pos)?;
        }
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn rows(&self) -> Coord {
        self.config.rows
    }

    pub fn cols(&self) -> Coord {
        self.config.cols
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened_count
    }

    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flag_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Position> {
        self.triggered_mine
    }

    /// Placed mines in row-major order, empty while the board is still [`GameStatus::Created`].
    pub fn mine_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.mine_layout.iter_mines()
    }

    pub fn is_opened(&self, pos: Position) -> Result<bool> {
        let pos = self.mine_layout.validate_position(pos)?;
        Ok(self.cell_at(pos).is_opened())
    }

    pub fn is_flagged(&self, pos: Position) -> Result<bool> {
        let pos = self.mine_layout.validate_position(pos)?;
        Ok(self.cell_at(pos).is_flagged())
    }

    /// What the player is allowed to see at `pos`.
    pub fn get(&self, pos: Position) -> Result<DisplayOutcome> {
        let pos = self.mine_layout.validate_position(pos)?;

        Ok(match self.cell_at(pos) {
            CellState::Flagged => DisplayOutcome::FlaggedCell,
            _ if self.mine_layout.contains_mine(pos) => {
                if self.status.is_finished() {
                    DisplayOutcome::Mine
                } else {
                    DisplayOutcome::Cell
                }
            }
            CellState::Hidden => DisplayOutcome::Cell,
            CellState::Opened => DisplayOutcome::OpenedCell(self.mine_layout.adjacent_mine_count(pos)),
        })
    }

    pub fn toggle_flag(&mut self, pos: Position) -> Result<MarkOutcome> {
        let pos = self.mine_layout.validate_position(pos)?;
        self.check_not_finished()?;

        Ok(match self.cell_at(pos) {
            CellState::Opened => MarkOutcome::NoChange,
            CellState::Flagged => {
                self.cells[pos.to_nd_index()] = CellState::Hidden;
                self.flag_count -= 1;
                MarkOutcome::Changed
            }
            CellState::Hidden => {
                self.cells[pos.to_nd_index()] = CellState::Flagged;
                self.flag_count += 1;
                if self.flags_match_mines() {
                    self.mark_won();
                } else {
                    self.check_for_win();
                }
                MarkOutcome::Changed
            }
        })
    }

    pub fn open(&mut self, pos: Position) -> Result<OpenOutcome> {
        let pos = self.mine_layout.validate_position(pos)?;
        self.check_not_finished()?;

        if self.status == GameStatus::Created {
            self.place_mines(pos);
        }

        if self.cell_at(pos).is_flagged() {
            return Ok(OpenOutcome::FlaggedCell);
        }

        if self.mine_layout.contains_mine(pos) {
            self.mark_opened(pos);
            self.triggered_mine = Some(pos);
            self.status = GameStatus::GameOver;
            log::debug!("Mine hit at {}, game over", pos);
            return Ok(OpenOutcome::Mine);
        }

        self.mark_opened(pos);
        let adjacent_mines = self.mine_layout.adjacent_mine_count(pos);
        log::debug!("Open cell at {}, mine count: {}", pos, adjacent_mines);

        if adjacent_mines == 0 {
            self.flood_open(pos);
        }

        self.check_for_win();
        Ok(OpenOutcome::Cell(adjacent_mines))
    }

    fn place_mines(&mut self, start: Position) {
        self.mine_layout = RandomMineGenerator::new(self.seed, start).generate(self.config);
        self.status = GameStatus::Playing;
    }

    /// Opens everything reachable from `start` through zero-count cells, stopping at flags.
    fn flood_open(&mut self, start: Position) {
        let mut to_visit = vec![start];

        while let Some(visit_pos) = to_visit.pop() {
            for neighbor in self.mine_layout.iter_neighbors(visit_pos) {
                if !matches!(self.cell_at(neighbor), CellState::Hidden) {
                    continue;
                }

                self.mark_opened(neighbor);
                let count = self.mine_layout.adjacent_mine_count(neighbor);
                log::trace!("Flood opened cell at {}, mine count: {}", neighbor, count);

                if count == 0 {
                    to_visit.push(neighbor);
                }
            }
        }
    }

    fn mark_opened(&mut self, pos: Position) {
        let cell = &mut self.cells[pos.to_nd_index()];
        if !cell.is_opened() {
            *cell = CellState::Opened;
            self.opened_count += 1;
        }
    }

    /// Flagged cells are exactly the mined cells.
    fn flags_match_mines(&self) -> bool {
        self.flag_count == self.mine_layout.mine_count()
            && self
                .mine_layout
                .iter_mines()
                .all(|pos| self.cell_at(pos).is_flagged())
    }

    /// Won once no cell is left untouched: each is flagged, opened or mined.
    fn check_for_win(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        let all_covered = iter_positions(self.config.size()).all(|pos| {
            !matches!(self.cell_at(pos), CellState::Hidden) || self.mine_layout.contains_mine(pos)
        });
        if all_covered {
            self.mark_won();
        }
    }

    fn mark_won(&mut self) {
        if self.status.is_finished() {
            return;
        }
        self.status = GameStatus::Won;
        log::debug!("Board cleared, game won");
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn cell_at(&self, pos: Position) -> CellState {
        self.cells[pos.to_nd_index()]
    }
}

/// Unchecked serialized form of [`Board`], validated on the way in.
#[derive(Deserialize)]
struct BoardData {
    config: GameConfig,
    seed: u64,
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    opened_count: CellCount,
    flag_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Position>,
}

impl TryFrom<BoardData> for Board {
    type Error = GameError;

    fn try_from(data: BoardData) -> Result<Self> {
        let board = Self {
            config: data.config,
            seed: data.seed,
            mine_layout: data.mine_layout,
            cells: data.cells,
            opened_count: data.opened_count,
            flag_count: data.flag_count,
            status: data.status,
            triggered_mine: data.triggered_mine,
        };
        board.validate()?;
        Ok(board)
    }
}
