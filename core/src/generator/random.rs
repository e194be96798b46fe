use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Purely random generation, bombs are spread uniformly over the whole board.
#[derive(Clone, Debug)]
pub struct RandomGridGenerator<R> {
    rng: R,
}

impl<R: Rng> RandomGridGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomGridGenerator<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GridGenerator for RandomGridGenerator<R> {
    fn generate(&mut self, config: GameConfig) -> Grid {
        let total_cells = config.total_cells();
        let mut bombs: Array2<bool> = Array2::default(config.size().to_nd_index());

        {
            let cells = bombs
                .as_slice_mut()
                .expect("freshly allocated array is in standard layout");
            for place in index::sample(&mut self.rng, total_cells.into(), config.bombs().into()) {
                cells[place] = true;
            }
        }

        log::debug!(
            "Generated {}x{} board with {} bombs",
            config.rows(),
            config.cols(),
            config.bombs()
        );
        Grid::from_bomb_mask(bombs).expect("validated config always produces a valid board")
    }
}
