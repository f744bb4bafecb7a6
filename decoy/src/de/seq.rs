use serde::de::{DeserializeSeed, SeqAccess};
use tracing::trace;

use crate::arbitrary::Arbitrary;
use crate::composer::Composer;
use crate::error::DeriveError;
use crate::generator::Generator;
use crate::path::Path;
use crate::primitives::IntGenerator;

use super::{ArbitraryDeserializer, ObjectContainer, ObjectKind};

/// Positional container with a randomly drawn length
///
/// The target length is drawn once, uniformly from `0..=max_sequence_length`. The
/// container reports the end once `cursor >= target_length - 1`, so a container of
/// target length `n > 0` yields `n - 1` elements and one of length 0 yields none.
#[derive(Debug)]
pub struct SequenceContainer<'c> {
    composer: Composer<'c>,
    path: Path,
    target_length: usize,
    cursor: usize,
}

impl<'c> SequenceContainer<'c> {
    /// Open a container, drawing its target length
    pub fn new(mut composer: Composer<'c>, path: Path) -> Self {
        let max_length = composer.config().max_sequence_length;
        let target_length = composer.generate_with(&IntGenerator::new(0usize, max_length));
        trace!(%path, target_length, "drew sequence length");
        Self::with_target_length(composer, path, target_length)
    }

    /// Open a container that yields exactly `len` elements
    pub fn exact(composer: Composer<'c>, path: Path, len: usize) -> Self {
        Self::with_target_length(composer, path, len.saturating_add(1))
    }

    pub fn with_target_length(composer: Composer<'c>, path: Path, target_length: usize) -> Self {
        Self {
            composer,
            path,
            target_length,
            cursor: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.target_length
    }

    fn remaining(&self) -> usize {
        self.target_length
            .saturating_sub(1)
            .saturating_sub(self.cursor)
    }

    fn advance(&mut self) -> Result<usize, DeriveError> {
        if self.is_at_end() {
            return Err(DeriveError::OutOfBounds {
                path: self.path.clone(),
                cursor: self.cursor,
                target_length: self.target_length,
            });
        }
        let index = self.cursor;
        self.cursor += 1;
        Ok(index)
    }

    /// Pop one element from the type's default distribution
    pub fn pop<T: Arbitrary>(&mut self) -> Result<T, DeriveError> {
        self.pop_with(&T::arbitrary())
    }

    /// Pop one element drawn from `generator`
    pub fn pop_with<G: Generator + ?Sized>(&mut self, generator: &G) -> Result<G::Value, DeriveError> {
        self.advance()?;
        Ok(self.composer.generate_with(generator))
    }

    /// Pop one element by deriving it at this element's path
    pub fn pop_seed<'de, S>(&mut self, seed: S) -> Result<S::Value, DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        let index = self.advance()?;
        seed.deserialize(ArbitraryDeserializer::new(
            self.composer.reborrow(),
            self.path.index(index),
        ))
    }

    /// Open a keyed container at the current position without consuming it
    pub fn nested_object_container(&mut self, kind: ObjectKind) -> ObjectContainer<'_> {
        ObjectContainer::new(self.composer.reborrow(), self.path.index(self.cursor), kind)
    }

    /// Open a positional container at the current position without consuming it
    pub fn nested_sequence_container(&mut self) -> SequenceContainer<'_> {
        SequenceContainer::new(self.composer.reborrow(), self.path.index(self.cursor))
    }

    /// A full decoding context at this container's path
    pub fn delegate_context(&mut self) -> ArbitraryDeserializer<'_> {
        ArbitraryDeserializer::new(self.composer.reborrow(), self.path.clone())
    }
}

impl<'de> SeqAccess<'de> for SequenceContainer<'_> {
    type Error = DeriveError;

    fn next_element_seed<S>(&mut self, seed: S) -> Result<Option<S::Value>, DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        if self.is_at_end() {
            return Ok(None);
        }
        self.pop_seed(seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::path::PathSegment;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Deserialize;

    #[test]
    fn test_zero_length_is_at_end_immediately() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let path = Path::root().key("items");
        let mut seq =
            SequenceContainer::with_target_length(Composer::new(&mut rng, &config), path.clone(), 0);

        assert!(seq.is_at_end());
        assert_eq!(
            seq.pop::<i32>(),
            Err(DeriveError::OutOfBounds {
                path,
                cursor: 0,
                target_length: 0,
            })
        );
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_last_index_is_unreachable() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut seq =
            SequenceContainer::with_target_length(Composer::new(&mut rng, &config), Path::root(), 3);

        assert_eq!(seq.target_length(), 3);
        assert!(seq.pop::<u8>().is_ok());
        assert!(seq.pop::<u8>().is_ok());
        assert!(seq.is_at_end());
        assert!(matches!(
            seq.pop::<u8>(),
            Err(DeriveError::OutOfBounds { cursor: 2, target_length: 3, .. })
        ));
    }

    #[test]
    fn test_target_length_within_configured_bound() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen_zero = false;
        let mut seen_positive = false;
        for _ in 0..2000 {
            let seq = SequenceContainer::new(Composer::new(&mut rng, &config), Path::root());
            assert!(seq.target_length() <= 100);
            seen_zero |= seq.target_length() == 0;
            seen_positive |= seq.target_length() > 0;
        }
        assert!(seen_zero);
        assert!(seen_positive);

        let tight = GeneratorConfig::default().with_max_sequence_length(0);
        let seq = SequenceContainer::new(Composer::new(&mut rng, &tight), Path::root());
        assert_eq!(seq.target_length(), 0);
    }

    #[test]
    fn test_exact_container_yields_requested_count() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut seq = SequenceContainer::exact(Composer::new(&mut rng, &config), Path::root(), 2);

        assert_eq!(seq.size_hint(), Some(2));
        assert!(seq.pop::<bool>().is_ok());
        assert!(seq.pop::<bool>().is_ok());
        assert!(seq.pop::<bool>().is_err());
    }

    #[test]
    fn test_nested_containers_do_not_consume_slots() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seq =
            SequenceContainer::with_target_length(Composer::new(&mut rng, &config), Path::root(), 5);

        let _ = seq.pop_with(&IntGenerator::new(0u8, 1)).unwrap();
        assert_eq!(
            seq.nested_object_container(ObjectKind::Map).path().segments(),
            &[PathSegment::Index(1)]
        );
        assert_eq!(
            seq.nested_sequence_container().path().segments(),
            &[PathSegment::Index(1)]
        );
        assert!(seq.delegate_context().path().is_root());
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn test_pop_seed_derives_at_element_path() {
        #[derive(Debug, Deserialize)]
        struct Item {
            name: String,
        }

        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut seq =
            SequenceContainer::with_target_length(Composer::new(&mut rng, &config), Path::root(), 2);

        let item = seq.pop_seed(std::marker::PhantomData::<Item>).unwrap();
        assert!(item.name.chars().count() <= 20);
        assert!(seq.pop_seed(std::marker::PhantomData::<Item>).is_err());
    }

    #[test]
    fn test_vec_lengths_follow_the_end_check() {
        let config = GeneratorConfig::default();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let target = SequenceContainer::new(Composer::new(&mut rng, &config), Path::root())
                .target_length();

            let mut replay = StdRng::seed_from_u64(seed);
            let values = Vec::<u32>::deserialize(ArbitraryDeserializer::root(Composer::new(
                &mut replay,
                &config,
            )))
            .unwrap();
            assert_eq!(values.len(), target.saturating_sub(1));
        }
    }
}
