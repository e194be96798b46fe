use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board needs at least one row and one column")]
    EmptyBoard,
    #[error("Too many bombs, at least one cell must be safe")]
    TooManyMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

impl GameError {
    /// Whether the error comes from a board configuration rather than a move.
    pub const fn is_invalid_configuration(self) -> bool {
        matches!(self, Self::EmptyBoard | Self::TooManyMines)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
