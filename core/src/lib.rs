//! Minesweeper game logic: board generation, flood-fill reveal, flagging and win/loss detection.
//!
//! The crate has no notion of rendering, input or time. A caller builds a [`GameSession`], feeds it moves and reads
//! back cells and status:
//!
//! ```
//! use sweeper_core::*;
//!
//! let session = GameSession::reset(GameConfig::BEGINNER, 7);
//! let session = session.reveal((4, 4))?;
//! assert_ne!(session.status(), GameStatus::Lost);
//! # Ok::<(), GameError>(())
//! ```
#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod types;

/// Board dimensions and bomb count, always leaving at least one safe cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    rows: Coord,
    cols: Coord,
    bombs: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    rows: Coord,
    cols: Coord,
    bombs: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.rows, raw.cols, raw.bombs)
    }
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked(9, 9, 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(16, 30, 99);

    pub(crate) const fn new_unchecked(rows: Coord, cols: Coord, bombs: CellCount) -> Self {
        Self { rows, cols, bombs }
    }

    pub fn new(rows: Coord, cols: Coord, bombs: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if bombs >= mult(rows, cols) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(rows, cols, bombs))
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn bombs(&self) -> CellCount {
        self.bombs
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.bombs
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}
