use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Position is outside the board")]
    OutOfBounds,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

impl GameError {
    /// Whether the error was raised while building a board rather than while playing it.
    pub const fn is_configuration_error(self) -> bool {
        matches!(self, Self::InvalidSize | Self::TooManyMines)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
