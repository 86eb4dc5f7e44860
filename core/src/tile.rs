use serde::{Deserialize, Serialize};

/// Player-side state of a single cell, independent of whether it holds a mine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Opened,
    Flagged,
}

impl CellState {
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}
