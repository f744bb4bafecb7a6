#![allow(clippy::result_large_err)]

//! # Decoy - Random Values for Any Deserializable Type
//!
//! Decoy derives a random-value generator for any type that implements
//! `serde::Deserialize`. Instead of describing a type's shape a second time, a
//! derivation runs the type's own decode logic against a deserializer that answers every
//! request with random draws: strings for string fields, a coin flip for optional
//! fields, a randomly sized run of elements for sequences and a random key set for maps.
//!
//! ## Quick Start
//!
//! ```rust
//! use decoy::{Generator, GeneratorConfig, arbitrary_generator_for};
//! use rand::thread_rng;
//! use serde::Deserialize;
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Deserialize)]
//! struct Nested {
//!     bazzes: Vec<String>,
//!     buzzes: HashMap<String, i64>,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Record {
//!     foo: String,
//!     bar: Option<i64>,
//!     nested: Nested,
//! }
//!
//! let generator = arbitrary_generator_for::<Record>();
//! let mut rng = thread_rng();
//! let config = GeneratorConfig::default();
//!
//! let record = generator.generate(&mut rng, &config);
//! assert!(record.nested.bazzes.len() <= 100);
//! ```
//!
//! Primitive generators and combinators are available on their own as well:
//!
//! ```rust
//! use decoy::{Generator, GeneratorConfig, IntGenerator, create_seeded_rng};
//!
//! let evens = IntGenerator::new(0u32, 100).such_that(|n| n % 2 == 0);
//! let mut rng = create_seeded_rng(42);
//! let value = evens.generate(&mut rng, &GeneratorConfig::default());
//! assert_eq!(value % 2, 0);
//! ```

pub mod arbitrary;
pub mod composer;
pub mod config;
pub mod de;
pub mod derive;
pub mod error;
pub mod generator;
pub mod path;
pub mod primitives;
pub mod rng;

pub use arbitrary::Arbitrary;
pub use composer::Composer;
pub use config::{ConfigError, GeneratorConfig};
pub use de::{
    ArbitraryDeserializer, ObjectContainer, ObjectKind, ScalarContainer, SequenceContainer,
    is_valid_key,
};
pub use derive::{Derivable, DerivedGenerator, arbitrary_generator_for};
pub use error::DeriveError;
pub use generator::{
    BoxedGenerator, Generator, elements, frequency, from_fn, just, one_of, optional,
};
pub use path::{Path, PathSegment};
pub use primitives::*;
pub use rng::{DefaultRngProvider, RngProvider, create_rng, create_seeded_rng};
