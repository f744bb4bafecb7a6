use std::marker::PhantomData;

use serde::de::{DeserializeOwned, DeserializeSeed, Visitor};
use tracing::trace;

use crate::arbitrary::Arbitrary;
use crate::composer::Composer;
use crate::error::DeriveError;
use crate::generator::{Generator, elements};
use crate::path::Path;
use crate::primitives::IntGenerator;

use super::{ArbitraryDeserializer, ObjectContainer, ObjectKind, SequenceContainer};

/// Single-value container: every request is one unconditional draw
#[derive(Debug)]
pub struct ScalarContainer<'c> {
    composer: Composer<'c>,
    path: Path,
}

/// The value kinds an untyped request picks between
#[derive(Debug, Clone, Copy)]
enum AnyShape {
    Bool,
    Integer,
    Float,
    Text,
    Sequence,
    Map,
}

impl<'c> ScalarContainer<'c> {
    pub fn new(composer: Composer<'c>, path: Path) -> Self {
        Self { composer, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Draw a primitive from its default distribution
    pub fn decode<T: Arbitrary>(&mut self) -> T {
        self.composer.generate()
    }

    pub fn decode_with<G: Generator + ?Sized>(&mut self, generator: &G) -> G::Value {
        self.composer.generate_with(generator)
    }

    /// Draw whether a null marker is present
    pub fn decode_nil(&mut self) -> bool {
        self.composer.generate()
    }

    /// Derive any further-decodable value at this container's path
    pub fn decode_value<T: DeserializeOwned>(&mut self) -> Result<T, DeriveError> {
        self.decode_seed(PhantomData::<T>)
    }

    pub fn decode_seed<'de, S>(&mut self, seed: S) -> Result<S::Value, DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        seed.deserialize(ArbitraryDeserializer::new(
            self.composer.reborrow(),
            self.path.clone(),
        ))
    }

    pub(crate) fn decode_bytes(&mut self) -> Vec<u8> {
        self.composer.generate_with(&u8::arbitrary().proliferate())
    }

    /// Serve a self-describing request: a null draw, then some value
    pub(crate) fn visit_any<'de, V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        if self.decode_nil() {
            return visitor.visit_unit();
        }
        self.visit_untyped(visitor)
    }

    /// Serve a self-describing request with a scalar or, above `max_any_depth`, a
    /// sequence or map of further untyped values
    ///
    /// Structured arms are sized by `size_hint` rather than `max_sequence_length`.
    pub(crate) fn visit_untyped<'de, V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        let mut shapes = vec![
            AnyShape::Bool,
            AnyShape::Integer,
            AnyShape::Float,
            AnyShape::Text,
        ];
        if self.path.segments().len() < self.composer.config().max_any_depth {
            shapes.extend([AnyShape::Sequence, AnyShape::Map]);
        }
        let shape = self.composer.generate_with(&elements(shapes));
        trace!(path = %self.path, ?shape, "untyped value");

        match shape {
            AnyShape::Bool => visitor.visit_bool(self.decode()),
            AnyShape::Integer => visitor.visit_i64(self.decode()),
            AnyShape::Float => visitor.visit_f64(self.decode()),
            AnyShape::Text => visitor.visit_string(self.decode()),
            AnyShape::Sequence => {
                let size_hint = self.composer.config().size_hint;
                let target_length = self
                    .composer
                    .generate_with(&IntGenerator::new(0usize, size_hint));
                visitor.visit_seq(SequenceContainer::with_target_length(
                    self.composer,
                    self.path,
                    target_length,
                ))
            }
            AnyShape::Map => visitor.visit_map(ObjectContainer::new(
                self.composer,
                self.path,
                ObjectKind::Map,
            )),
        }
    }
}
