//! RNG provisioning for derivations.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Trait for providing random number generators
pub trait RngProvider {
    /// The type of RNG this provider creates
    type Rng: rand::RngCore;

    /// Create a new RNG instance with an optional seed
    fn create_rng(&self, seed: Option<u64>) -> Self::Rng;

    /// Create a new RNG instance with a random seed
    fn create_random_rng(&self) -> Self::Rng {
        self.create_rng(None)
    }
}

/// Default RNG provider using `StdRng`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRngProvider;

impl RngProvider for DefaultRngProvider {
    type Rng = StdRng;

    fn create_rng(&self, seed: Option<u64>) -> Self::Rng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Create a new entropy-seeded RNG
pub fn create_rng() -> StdRng {
    DefaultRngProvider.create_random_rng()
}

/// Create a new RNG with a specific seed
pub fn create_seeded_rng(seed: u64) -> StdRng {
    DefaultRngProvider.create_rng(Some(seed))
}
