use std::collections::HashSet;

use serde::de::{DeserializeSeed, Error as _, MapAccess};
use tracing::trace;

use crate::arbitrary::Arbitrary;
use crate::composer::Composer;
use crate::error::DeriveError;
use crate::generator::{Generator, optional};
use crate::path::Path;
use crate::primitives::IntGenerator;

use super::field::FieldDeserializer;
use super::key::{DrawnKey, KeyDeserializer, KeyDrawer};
use super::{ArbitraryDeserializer, ScalarContainer, SequenceContainer};

/// Where an object container takes its keys from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Named fields declared by the consuming type
    Struct(&'static [&'static str]),
    /// Keys the container enumerates itself
    Map,
}

/// Whether `candidate` can be used as an enumerated key
pub fn is_valid_key(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.chars().any(char::is_control)
}

/// Keyed container for named fields and map entries
///
/// Until keys are enumerated every requested key counts as present. Enumeration draws
/// a random set of valid key names once and memoizes it; from then on only those keys
/// are present.
///
/// A map walked through `MapAccess` before any enumeration draws its key count up front
/// and then each key from the distribution of the consumer's own key type, memoizing the
/// key's text as it goes.
#[derive(Debug)]
pub struct ObjectContainer<'c> {
    composer: Composer<'c>,
    path: Path,
    kind: ObjectKind,
    enumerated_keys: Option<Vec<String>>,
    key_target: Option<usize>,
    next_key: usize,
    pending_key: Option<String>,
}

impl<'c> ObjectContainer<'c> {
    pub fn new(composer: Composer<'c>, path: Path, kind: ObjectKind) -> Self {
        Self {
            composer,
            path,
            kind,
            enumerated_keys: None,
            key_target: None,
            next_key: 0,
            pending_key: None,
        }
    }

    /// A map container whose key set is already memoized
    pub fn with_enumerated_keys<I, K>(composer: Composer<'c>, path: Path, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut container = Self::new(composer, path, ObjectKind::Map);
        container.enumerated_keys = Some(distinct(keys.into_iter().map(Into::into)));
        container
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn contains(&self, key: &str) -> bool {
        match &self.enumerated_keys {
            None => true,
            Some(keys) => keys.iter().any(|candidate| candidate == key),
        }
    }

    /// The container's key set, drawn on first use
    pub fn enumerate_keys(&mut self) -> &[String] {
        if self.enumerated_keys.is_none() {
            let candidates = String::arbitrary()
                .such_that(|key: &String| is_valid_key(key))
                .proliferate();
            let keys = distinct(self.composer.generate_with(&candidates));
            trace!(path = %self.path, count = keys.len(), "enumerated keys");
            self.enumerated_keys = Some(keys);
        }
        self.enumerated_keys.as_deref().unwrap_or_default()
    }

    pub(super) fn require(&self, key: &str) -> Result<(), DeriveError> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(DeriveError::KeyNotFound {
                key: key.to_string(),
                path: self.path.clone(),
            })
        }
    }

    pub fn decode_required<T: Arbitrary>(&mut self, key: &str) -> Result<T, DeriveError> {
        self.decode_required_with(key, &T::arbitrary())
    }

    pub fn decode_required_with<G: Generator + ?Sized>(
        &mut self,
        key: &str,
        generator: &G,
    ) -> Result<G::Value, DeriveError> {
        self.require(key)?;
        Ok(self.composer.generate_with(generator))
    }

    /// Derive the value stored under `key` through the consuming type's decode logic
    pub fn decode_required_seed<'de, S>(&mut self, key: &str, seed: S) -> Result<S::Value, DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        self.require(key)?;
        seed.deserialize(FieldDeserializer::new(self, key))
    }

    // Optional decoding never consults `contains`: absence is one arm of the draw.

    pub fn decode_optional<T: Arbitrary>(&mut self, key: &str) -> Option<T> {
        self.decode_optional_with(key, &T::arbitrary())
    }

    pub fn decode_optional_with<G: Generator + ?Sized>(
        &mut self,
        key: &str,
        generator: &G,
    ) -> Option<G::Value> {
        let value = self.composer.generate_with(&optional(generator));
        trace!(path = %self.path, key, present = value.is_some(), "optional field");
        value
    }

    pub fn decode_optional_seed<'de, S>(
        &mut self,
        key: &str,
        seed: S,
    ) -> Result<Option<S::Value>, DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        match self.optional_context(key) {
            Some(context) => seed.deserialize(context).map(Some),
            None => Ok(None),
        }
    }

    /// Draw the optional arm for `key`, handing back a context when the value is present
    pub(super) fn optional_context(&mut self, key: &str) -> Option<ArbitraryDeserializer<'_>> {
        let present: bool = self.composer.generate();
        trace!(path = %self.path, key, present, "optional field");
        if present {
            Some(ArbitraryDeserializer::new(
                self.composer.reborrow(),
                self.path.key(key),
            ))
        } else {
            None
        }
    }

    pub fn decode_nil(&mut self, key: &str) -> bool {
        self.contains(key) && self.composer.generate::<bool>()
    }

    // The presence draw is taken but not acted on: the nested container is returned
    // whatever it says.
    fn draw_presence(&mut self, key: &str) -> Result<(), DeriveError> {
        let _present: bool = self.decode_required(key)?;
        Ok(())
    }

    pub fn nested_object_container(
        &mut self,
        key: &str,
        kind: ObjectKind,
    ) -> Result<ObjectContainer<'_>, DeriveError> {
        self.draw_presence(key)?;
        Ok(ObjectContainer::new(
            self.composer.reborrow(),
            self.path.key(key),
            kind,
        ))
    }

    pub fn nested_sequence_container(
        &mut self,
        key: &str,
    ) -> Result<SequenceContainer<'_>, DeriveError> {
        self.draw_presence(key)?;
        Ok(SequenceContainer::new(
            self.composer.reborrow(),
            self.path.key(key),
        ))
    }

    pub(super) fn nested_tuple_container(
        &mut self,
        key: &str,
        len: usize,
    ) -> Result<SequenceContainer<'_>, DeriveError> {
        self.draw_presence(key)?;
        Ok(SequenceContainer::exact(
            self.composer.reborrow(),
            self.path.key(key),
            len,
        ))
    }

    pub(super) fn scalar_container_for(
        &mut self,
        key: &str,
    ) -> Result<ScalarContainer<'_>, DeriveError> {
        self.require(key)?;
        Ok(ScalarContainer::new(
            self.composer.reborrow(),
            self.path.key(key),
        ))
    }

    /// A full decoding context at this container's path
    pub fn delegate_context(&mut self) -> ArbitraryDeserializer<'_> {
        ArbitraryDeserializer::new(self.composer.reborrow(), self.path.clone())
    }

    /// A full decoding context for the value under `key`
    pub fn delegate_context_for(
        &mut self,
        key: &str,
    ) -> Result<ArbitraryDeserializer<'_>, DeriveError> {
        self.draw_presence(key)?;
        Ok(ArbitraryDeserializer::new(
            self.composer.reborrow(),
            self.path.key(key),
        ))
    }
}

impl ObjectContainer<'_> {
    fn begin_key_draws(&mut self) {
        let size_hint = self.composer.config().size_hint;
        let target = self.composer.generate_with(&IntGenerator::new(0usize, size_hint));
        trace!(path = %self.path, target, "drawing typed keys");
        self.enumerated_keys = Some(Vec::with_capacity(target));
        self.key_target = Some(target);
    }

    fn next_drawn_key<'de, K>(&mut self, seed: K, target: usize) -> Result<Option<K::Value>, DeriveError>
    where
        K: DeserializeSeed<'de>,
    {
        if self.next_key >= target {
            return Ok(None);
        }

        let mut drawn = None;
        let taken = self.enumerated_keys.as_deref().unwrap_or_default();
        let value = seed.deserialize(KeyDrawer::new(
            self.composer.reborrow(),
            &self.path,
            taken,
            &mut drawn,
        ))?;
        let DrawnKey { text, fresh } =
            drawn.ok_or_else(|| DeriveError::custom("map key type requested no value"))?;
        self.next_key += 1;

        if fresh {
            self.enumerated_keys
                .get_or_insert_with(Vec::new)
                .push(text.clone());
        } else {
            // The repeat still carries a value; the walk stops after it
            self.key_target = Some(self.next_key);
        }
        self.pending_key = Some(text);
        Ok(Some(value))
    }
}

impl<'de> MapAccess<'de> for ObjectContainer<'_> {
    type Error = DeriveError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, DeriveError>
    where
        K: DeserializeSeed<'de>,
    {
        if self.kind == ObjectKind::Map && self.enumerated_keys.is_none() {
            self.begin_key_draws();
        }
        if let Some(target) = self.key_target {
            return self.next_drawn_key(seed, target);
        }

        let index = self.next_key;
        let key = match self.kind {
            ObjectKind::Struct(fields) => fields.get(index).map(|field| field.to_string()),
            ObjectKind::Map => self.enumerate_keys().get(index).cloned(),
        };
        let Some(key) = key else {
            return Ok(None);
        };
        self.next_key += 1;

        let value = seed.deserialize(KeyDeserializer::new(&key, &self.path))?;
        self.pending_key = Some(key);
        Ok(Some(value))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, DeriveError>
    where
        V: DeserializeSeed<'de>,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| DeriveError::custom("value requested before its key"))?;
        self.decode_required_seed(&key, seed)
    }

    fn size_hint(&self) -> Option<usize> {
        match self.kind {
            ObjectKind::Struct(fields) => Some(fields.len().saturating_sub(self.next_key)),
            ObjectKind::Map => match self.key_target {
                Some(target) => Some(target.saturating_sub(self.next_key)),
                None => self
                    .enumerated_keys
                    .as_ref()
                    .map(|keys| keys.len().saturating_sub(self.next_key)),
            },
        }
    }
}

fn distinct(keys: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
