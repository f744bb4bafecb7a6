//! Generators for primitive types.

use rand::{Rng, RngCore};

use crate::arbitrary::Arbitrary;
use crate::config::GeneratorConfig;
use crate::generator::Generator;

/// Generator for boolean values
#[derive(Debug, Clone)]
pub struct BoolGenerator;

impl Generator for BoolGenerator {
    type Value = bool;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> bool {
        rng.r#gen()
    }
}

/// Generator for integer types within an inclusive range
#[derive(Debug, Clone)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: Copy + PartialOrd,
{
    /// Create a new integer generator over `min..=max`
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

macro_rules! impl_int_generator {
    ($($t:ty),*) => {
        $(
            impl Generator for IntGenerator<$t> {
                type Value = $t;

                fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> $t {
                    rng.gen_range(self.min..=self.max)
                }
            }

            impl IntGenerator<$t> {
                /// Create a generator for the full range of the type
                pub fn full_range() -> Self {
                    Self::new(<$t>::MIN, <$t>::MAX)
                }
            }

            impl Arbitrary for $t {
                type Generator = IntGenerator<$t>;

                fn arbitrary() -> Self::Generator {
                    IntGenerator::<$t>::full_range()
                }
            }
        )*
    };
}

impl_int_generator!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

/// Generator for floating-point types within an inclusive range
#[derive(Debug, Clone)]
pub struct FloatGenerator<T> {
    min: T,
    max: T,
}

impl<T> FloatGenerator<T>
where
    T: Copy + PartialOrd,
{
    /// Create a new float generator with the specified range
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

macro_rules! impl_float_generator {
    ($($t:ty),*) => {
        $(
            impl Generator for FloatGenerator<$t> {
                type Value = $t;

                fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> $t {
                    rng.gen_range(self.min..=self.max)
                }
            }

            impl FloatGenerator<$t> {
                /// Create a generator for a reasonable range of the type
                pub fn reasonable_range() -> Self {
                    Self::new(-1000.0, 1000.0)
                }
            }

            impl Arbitrary for $t {
                type Generator = FloatGenerator<$t>;

                fn arbitrary() -> Self::Generator {
                    FloatGenerator::<$t>::reasonable_range()
                }
            }
        )*
    };
}

impl_float_generator!(f32, f64);

impl Arbitrary for bool {
    type Generator = BoolGenerator;

    fn arbitrary() -> Self::Generator {
        BoolGenerator
    }
}

/// Generator for character values
#[derive(Debug, Clone)]
pub struct CharGenerator {
    /// Inclusive character ranges to generate from
    ranges: Vec<(char, char)>,
}

impl CharGenerator {
    /// ASCII printable characters
    pub fn ascii_printable() -> Self {
        Self {
            ranges: vec![(' ', '~')],
        }
    }

    /// ASCII alphanumeric characters
    pub fn ascii_alphanumeric() -> Self {
        Self {
            ranges: vec![('0', '9'), ('A', 'Z'), ('a', 'z')],
        }
    }

    /// Printable ASCII, Latin-1 and a slice of the basic multilingual plane
    pub fn printable() -> Self {
        Self {
            ranges: vec![
                (' ', '~'),
                ('\u{a1}', '\u{ff}'),
                ('\u{370}', '\u{3ff}'),
                ('\u{4e00}', '\u{9fff}'),
            ],
        }
    }

    /// Custom character ranges
    pub fn with_ranges(ranges: Vec<(char, char)>) -> Self {
        Self { ranges }
    }
}

impl Generator for CharGenerator {
    type Value = char;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> char {
        if self.ranges.is_empty() {
            return 'a';
        }

        let (start, end) = self.ranges[rng.gen_range(0..self.ranges.len())];
        let code = rng.gen_range(start as u32..=end as u32);

        // Surrogates are the only gap; none of the built-in ranges cross them
        char::from_u32(code).unwrap_or(start)
    }
}

impl Arbitrary for char {
    type Generator = CharGenerator;

    fn arbitrary() -> Self::Generator {
        CharGenerator::printable()
    }
}

/// Generator for string values
#[derive(Debug, Clone)]
pub struct StringGenerator {
    char_generator: CharGenerator,
    min_length: usize,
    max_length: usize,
}

impl StringGenerator {
    /// Strings of ASCII printable characters
    pub fn ascii_printable(min_length: usize, max_length: usize) -> Self {
        Self::with_char_generator(CharGenerator::ascii_printable(), min_length, max_length)
    }

    /// Strings of ASCII alphanumeric characters
    pub fn ascii_alphanumeric(min_length: usize, max_length: usize) -> Self {
        Self::with_char_generator(CharGenerator::ascii_alphanumeric(), min_length, max_length)
    }

    /// Strings drawn from a custom character generator
    pub fn with_char_generator(
        char_generator: CharGenerator,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            char_generator,
            min_length,
            max_length,
        }
    }
}

impl Generator for StringGenerator {
    type Value = String;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> String {
        let max_len = self.max_length.min(config.size_hint * 2);
        let length = if self.min_length >= max_len {
            self.min_length
        } else {
            rng.gen_range(self.min_length..=max_len)
        };

        (0..length)
            .map(|_| self.char_generator.generate(rng, config))
            .collect()
    }
}

impl Arbitrary for String {
    type Generator = StringGenerator;

    fn arbitrary() -> Self::Generator {
        StringGenerator::with_char_generator(CharGenerator::printable(), 0, usize::MAX)
    }
}
