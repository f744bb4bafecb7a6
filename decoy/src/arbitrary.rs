//! Arbitrary trait: the default distribution of a primitive type.

use crate::generator::Generator;

/// Trait for types that carry a default generator
///
/// Implemented for the primitive leaf types a derivation can reach: booleans, every
/// integer width, both float widths, `char` and `String`. Structured types don't
/// implement this; they get their generator from [`crate::arbitrary_generator_for`].
pub trait Arbitrary: Sized {
    /// The generator type used to produce values of this type
    type Generator: Generator<Value = Self>;

    /// Create the default generator for this type
    fn arbitrary() -> Self::Generator;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn draw<T: Arbitrary>(seed: u64) -> T {
        let mut rng = StdRng::seed_from_u64(seed);
        T::arbitrary().generate(&mut rng, &GeneratorConfig::default())
    }

    #[test]
    fn test_default_distributions() {
        let float: f32 = draw(1);
        assert!((-1000.0..=1000.0).contains(&float));

        let text: String = draw(2);
        assert!(text.chars().count() <= 20);

        let _: u16 = draw(3);
        let _: bool = draw(4);
        let _: char = draw(5);
    }

    #[test]
    fn test_default_distribution_is_seed_stable() {
        assert_eq!(draw::<i64>(42), draw::<i64>(42));
        assert_eq!(draw::<String>(42), draw::<String>(42));
    }
}
