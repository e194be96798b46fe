use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Board generated, no cell revealed yet
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves change it anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// A single game from the first click until it is won or lost.
///
/// Sessions are plain values: every move borrows the current session and returns the next one, the input is never
/// touched. Randomness is carried as a seed so two sessions driven by the same moves stay equal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    grid: Grid,
    bombs_remaining: i32,
    status: GameStatus,
    seed: u64,
}

impl GameSession {
    /// Starts a new game with a freshly generated board.
    pub fn reset(config: GameConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = RandomGridGenerator::new(&mut rng).generate(config);
        Self::from_grid(grid, rng.next_u64())
    }

    /// Like [`GameSession::reset`], seeded from the thread-local generator.
    pub fn reset_from_entropy(config: GameConfig) -> Self {
        Self::reset(config, rand::rng().next_u64())
    }

    /// Starts a new game on a given board, `seed` is used if the first click needs a new board.
    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        Self {
            bombs_remaining: i32::from(grid.bomb_count()),
            grid,
            status: GameStatus::NotStarted,
            seed,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.grid.config()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.grid.validate_coords(coords)?;
        Ok(self.grid[coords])
    }

    /// Bomb count minus placed flags, goes negative when over-flagged.
    pub fn bombs_remaining(&self) -> i32 {
        self.bombs_remaining
    }

    pub fn revealed_count(&self) -> CellCount {
        self.grid.revealed_count()
    }

    /// The bomb that ended a lost game.
    pub fn triggered_bomb(&self) -> Option<Coord2> {
        self.grid.highlighted()
    }

    /// Reveals a cell, flooding through empty regions, and returns the resulting session.
    ///
    /// The first reveal of a game never hits a bomb. Revealing flagged or already revealed cells, or any cell after
    /// the game ended, returns an unchanged session.
    pub fn reveal(&self, coords: Coord2) -> Result<Self> {
        let coords = self.grid.validate_coords(coords)?;
        let mut next = self.clone();
        next.apply_reveal(coords);
        Ok(next)
    }

    /// Flags a hidden cell or unflags a flagged one and returns the resulting session.
    pub fn toggle_flag(&self, coords: Coord2) -> Result<Self> {
        let coords = self.grid.validate_coords(coords)?;
        let mut next = self.clone();
        next.apply_toggle_flag(coords);
        Ok(next)
    }

    fn apply_reveal(&mut self, coords: Coord2) {
        if self.status.is_finished() {
            return;
        }

        if self.status.is_ready() {
            self.ensure_safe_start(coords);
            self.status = GameStatus::Playing;
        }

        let cell = self.grid[coords];
        if !cell.is_hidden() {
            return;
        }

        if cell.is_bomb() {
            self.grid.explode(coords);
            self.status = GameStatus::Lost;
            log::debug!("Bomb hit at {:?}, game lost", coords);
            return;
        }

        let opened = self.grid.reveal_safe(coords);
        log::debug!("Revealed {} cell(s) from {:?}", opened, coords);

        if !self.grid.has_hidden_safe_cell() {
            self.grid.flag_bombs();
            self.bombs_remaining = 0;
            self.status = GameStatus::Won;
            log::debug!("No hidden safe cell left, game won");
        }
    }

    /// Swaps the board for one where `coords` is safe, keeping any flags already placed.
    fn ensure_safe_start(&mut self, coords: Coord2) {
        if !self.grid[coords].is_bomb() {
            return;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut grid = RandomGridGenerator::new(&mut rng).regenerate_avoiding(self.config(), coords);
        grid.copy_flags_from(&self.grid);
        self.grid = grid;
        self.seed = rng.next_u64();
    }

    fn apply_toggle_flag(&mut self, coords: Coord2) {
        if self.status.is_finished() {
            return;
        }

        match self.grid[coords].visibility() {
            Visibility::Hidden => {
                self.grid.set_visibility(coords, Visibility::Flagged);
                self.bombs_remaining -= 1;
            }
            Visibility::Flagged => {
                self.grid.set_visibility(coords, Visibility::Hidden);
                self.bombs_remaining += 1;
            }
            Visibility::Revealed => {}
        }
    }
}
