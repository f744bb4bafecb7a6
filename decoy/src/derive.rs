//! Generators derived from a type's own `Deserialize` impl.
//!
//! A [`DerivedGenerator`] never looks at the type's fields itself. Each sample runs the
//! type's decode logic against an [`ArbitraryDeserializer`], which answers every
//! request it makes with random draws.

use std::fmt;
use std::marker::PhantomData;

use rand::RngCore;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::composer::Composer;
use crate::config::GeneratorConfig;
use crate::de::ArbitraryDeserializer;
use crate::error::DeriveError;
use crate::generator::Generator;
use crate::rng::{create_rng, create_seeded_rng};

/// A generator for any type that knows how to deserialize itself
///
/// Stateless: every sample opens a fresh composer and container tree.
pub struct DerivedGenerator<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Derive a generator for `T` from its `Deserialize` impl
///
/// ```rust
/// use decoy::{Generator, GeneratorConfig, arbitrary_generator_for, create_seeded_rng};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct User {
///     name: String,
///     age: Option<u8>,
///     tags: Vec<String>,
/// }
///
/// let generator = arbitrary_generator_for::<User>();
/// let mut rng = create_seeded_rng(7);
/// let user = generator.generate(&mut rng, &GeneratorConfig::default());
/// assert!(user.tags.len() <= 100);
/// ```
pub fn arbitrary_generator_for<T: DeserializeOwned>() -> DerivedGenerator<T> {
    DerivedGenerator::new()
}

impl<T: DeserializeOwned> DerivedGenerator<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Run one derivation attempt
    pub fn try_generate(
        &self,
        rng: &mut dyn RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, DeriveError> {
        trace!(target_type = std::any::type_name::<T>(), "deriving value");
        T::deserialize(ArbitraryDeserializer::root(Composer::new(rng, config)))
    }

    /// Draw one value with the default configuration and an entropy-seeded RNG
    pub fn sample(&self) -> T {
        self.generate(&mut create_rng(), &GeneratorConfig::default())
    }

    /// Draw one value with the default configuration, reproducibly
    pub fn sample_seeded(&self, seed: u64) -> T {
        self.generate(&mut create_seeded_rng(seed), &GeneratorConfig::default())
    }
}

impl<T: DeserializeOwned> Generator for DerivedGenerator<T> {
    type Value = T;

    /// Resample until the type's decode logic accepts a derivation
    ///
    /// Panics once `max_derive_attempts` attempts have all failed.
    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        let mut last_error = None;
        for attempt in 0..config.max_derive_attempts {
            match self.try_generate(rng, config) {
                Ok(value) => return value,
                Err(error) => {
                    debug!(
                        target_type = std::any::type_name::<T>(),
                        attempt,
                        %error,
                        "derivation attempt aborted, resampling"
                    );
                    last_error = Some(error);
                }
            }
        }
        match last_error {
            Some(error) => panic!(
                "failed to derive a {} after {} attempts: {}",
                std::any::type_name::<T>(),
                config.max_derive_attempts,
                error
            ),
            None => panic!(
                "failed to derive a {}: no attempts allowed",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T: DeserializeOwned> Default for DerivedGenerator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DerivedGenerator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DerivedGenerator<T> {}

impl<T> fmt::Debug for DerivedGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedGenerator")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

/// Types whose generator can be derived from their `Deserialize` impl
pub trait Derivable: DeserializeOwned {
    fn derived_generator() -> DerivedGenerator<Self> {
        arbitrary_generator_for::<Self>()
    }
}

impl<T: DeserializeOwned> Derivable for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Deserialize;
    use serde::de::{Deserializer, Error as _};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reading {
        sensor: String,
        value: f64,
        samples: Vec<u16>,
    }

    /// Accepts only even numbers, failing the derivation otherwise
    #[derive(Debug)]
    struct Even(u8);

    impl<'de> Deserialize<'de> for Even {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = u8::deserialize(deserializer)?;
            if value % 2 == 0 {
                Ok(Even(value))
            } else {
                Err(D::Error::custom("odd"))
            }
        }
    }

    /// Never derives
    #[derive(Debug)]
    struct Refused;

    impl<'de> Deserialize<'de> for Refused {
        fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
            Err(D::Error::custom("refused"))
        }
    }

    #[test]
    fn test_seeded_samples_are_reproducible() {
        let generator = arbitrary_generator_for::<Reading>();
        assert_eq!(generator.sample_seeded(99), generator.sample_seeded(99));

        let config = GeneratorConfig::default();
        let mut first = StdRng::seed_from_u64(3);
        let mut second = StdRng::seed_from_u64(3);
        assert_eq!(
            generator.generate(&mut first, &config),
            generator.generate(&mut second, &config)
        );
    }

    #[test]
    fn test_try_generate_reports_decode_failures() {
        let generator = Refused::derived_generator();
        let mut rng = StdRng::seed_from_u64(1);
        let result = generator.try_generate(&mut rng, &GeneratorConfig::default());
        assert!(matches!(result, Err(DeriveError::Custom(ref message)) if message == "refused"));
    }

    #[test]
    fn test_generate_resamples_rejected_attempts() {
        let generator = arbitrary_generator_for::<Even>();
        let mut rng = StdRng::seed_from_u64(2);
        let config = GeneratorConfig::default();

        for _ in 0..50 {
            assert_eq!(generator.generate(&mut rng, &config).0 % 2, 0);
        }
    }

    #[test]
    #[should_panic(expected = "after 3 attempts: refused")]
    fn test_generate_panics_when_attempts_run_out() {
        let config = GeneratorConfig::default().with_max_derive_attempts(3);
        let mut rng = StdRng::seed_from_u64(4);
        arbitrary_generator_for::<Refused>().generate(&mut rng, &config);
    }

    #[test]
    fn test_derived_generator_composes_with_combinators() {
        let generator = arbitrary_generator_for::<Reading>()
            .map(|reading| reading.samples.len())
            .proliferate();
        let mut rng = StdRng::seed_from_u64(5);

        let lengths = generator.generate(&mut rng, &GeneratorConfig::default());
        assert!(lengths.len() <= 10);
        assert!(lengths.iter().all(|&len| len <= 100));
    }

    #[test]
    fn test_debug_names_the_target() {
        let rendered = format!("{:?}", Reading::derived_generator());
        assert!(rendered.contains("Reading"));
    }
}
