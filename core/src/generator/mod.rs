use crate::*;
pub use random::*;

mod random;

pub trait GridGenerator {
    /// Produces a fresh board for an already validated configuration.
    fn generate(&mut self, config: GameConfig) -> Grid;

    /// Generates boards until the cell at `avoid` is safe.
    ///
    /// Terminates with probability 1: a valid [`GameConfig`] always leaves at least one safe cell, so each attempt
    /// succeeds with probability `1 - bombs / cells` and the expected number of attempts is its inverse.
    fn regenerate_avoiding(&mut self, config: GameConfig, avoid: Coord2) -> Grid {
        debug_assert!(config.bombs() < config.total_cells());
        debug_assert!(avoid.0 < config.rows() && avoid.1 < config.cols());

        let mut attempts: u32 = 1;
        loop {
            let grid = self.generate(config);
            if !grid[avoid].is_bomb() {
                log::debug!("Generated safe start at {:?} after {} attempt(s)", avoid, attempts);
                return grid;
            }
            attempts += 1;
        }
    }
}
