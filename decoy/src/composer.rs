//! Sequential composition of random draws.

use rand::RngCore;

use crate::arbitrary::Arbitrary;
use crate::config::GeneratorConfig;
use crate::generator::Generator;

/// Draws values from generators as steps of one larger construction
///
/// A composer borrows a single RNG and configuration for the duration of a derivation.
/// Containers share it by re-borrowing, so every draw of one derivation is taken from
/// the same random stream in call order.
pub struct Composer<'c> {
    rng: &'c mut dyn RngCore,
    config: &'c GeneratorConfig,
}

impl<'c> Composer<'c> {
    pub fn new(rng: &'c mut dyn RngCore, config: &'c GeneratorConfig) -> Self {
        Self { rng, config }
    }

    /// Draw a value from the type's default distribution
    pub fn generate<T: Arbitrary>(&mut self) -> T {
        self.generate_with(&T::arbitrary())
    }

    /// Draw a value from `generator`
    pub fn generate_with<G: Generator + ?Sized>(&mut self, generator: &G) -> G::Value {
        generator.generate(&mut *self.rng, self.config)
    }

    pub fn config(&self) -> &'c GeneratorConfig {
        self.config
    }

    /// Borrow this composer for a nested step
    pub fn reborrow(&mut self) -> Composer<'_> {
        Composer {
            rng: &mut *self.rng,
            config: self.config,
        }
    }
}

impl std::fmt::Debug for Composer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::IntGenerator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_composer_draws_from_generators() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GeneratorConfig::default();
        let mut composer = Composer::new(&mut rng, &config);

        for _ in 0..50 {
            let value = composer.generate_with(&IntGenerator::new(3u8, 9));
            assert!((3..=9).contains(&value));
        }
        let _flag: bool = composer.generate();
    }

    #[test]
    fn test_reborrow_shares_the_stream() {
        let config = GeneratorConfig::default();

        let mut rng = StdRng::seed_from_u64(5);
        let mut composer = Composer::new(&mut rng, &config);
        let first: u64 = composer.generate();
        let second: u64 = composer.reborrow().generate();

        let mut replay = StdRng::seed_from_u64(5);
        let mut straight = Composer::new(&mut replay, &config);
        assert_eq!(straight.generate::<u64>(), first);
        assert_eq!(straight.generate::<u64>(), second);
    }

    #[test]
    fn test_config_is_visible() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = GeneratorConfig::default().with_size_hint(4);
        let composer = Composer::new(&mut rng, &config);
        assert_eq!(composer.config().size_hint, 4);
    }
}
