use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from OS entropy; the chosen seed is kept so a game can be replayed.
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().next_u64();
        Self::from_seed(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..bound`. `bound` must be nonzero.
    pub fn below(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}
