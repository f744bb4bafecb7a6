//! A `serde::Deserializer` that answers every request with random draws.
//!
//! [`ArbitraryDeserializer`] is the root context handed to a type's own `Deserialize`
//! impl. It never reads input: primitive requests are satisfied by the composer, and
//! shape requests (structs, maps, sequences) open one of three containers:
//!
//! - [`ObjectContainer`] for named fields and map entries,
//! - [`SequenceContainer`] for positional elements,
//! - [`ScalarContainer`] for single values.

mod field;
mod key;
mod object;
mod scalar;
mod seq;
mod variant;

use serde::de::{Deserializer, Visitor};

use crate::composer::Composer;
use crate::error::DeriveError;
use crate::path::Path;

pub use object::{ObjectContainer, ObjectKind, is_valid_key};
pub use scalar::ScalarContainer;
pub use seq::SequenceContainer;

/// The root decoding context of a derivation
#[derive(Debug)]
pub struct ArbitraryDeserializer<'c> {
    composer: Composer<'c>,
    path: Path,
}

impl<'c> ArbitraryDeserializer<'c> {
    pub fn new(composer: Composer<'c>, path: Path) -> Self {
        Self { composer, path }
    }

    /// A context for a top-level value
    pub fn root(composer: Composer<'c>) -> Self {
        Self::new(composer, Path::root())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a keyed container at this context's path
    pub fn object_container(&mut self, kind: ObjectKind) -> ObjectContainer<'_> {
        ObjectContainer::new(self.composer.reborrow(), self.path.clone(), kind)
    }

    /// Open a positional container with a freshly drawn length
    pub fn sequence_container(&mut self) -> SequenceContainer<'_> {
        SequenceContainer::new(self.composer.reborrow(), self.path.clone())
    }

    /// Open a single-value container
    pub fn scalar_container(&mut self) -> ScalarContainer<'_> {
        ScalarContainer::new(self.composer.reborrow(), self.path.clone())
    }
}

macro_rules! deserialize_scalars {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.scalar_container().decode::<$ty>())
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ArbitraryDeserializer<'_> {
    type Error = DeriveError;

    fn deserialize_any<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.scalar_container().visit_any(visitor)
    }

    deserialize_scalars! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
        deserialize_char => visit_char(char),
        deserialize_str => visit_string(String),
        deserialize_string => visit_string(String),
        deserialize_identifier => visit_string(String),
    }

    fn deserialize_bytes<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_byte_buf(self.scalar_container().decode_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        if self.scalar_container().decode_nil() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(self.sequence_container())
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SequenceContainer::exact(self.composer, self.path, len))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self.object_container(ObjectKind::Map))
    }

    fn deserialize_struct<V>(
        mut self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self.object_container(ObjectKind::Struct(fields)))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        variant::visit_enum(self.composer, self.path, variants, visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Deserialize;
    use serde::de::DeserializeOwned;
    use std::collections::BTreeMap;

    fn derive_many<T: DeserializeOwned>(count: usize) -> Vec<T> {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(2024);
        (0..count)
            .map(|_| {
                let composer = Composer::new(&mut rng, &config);
                T::deserialize(ArbitraryDeserializer::root(composer)).unwrap()
            })
            .collect()
    }

    #[derive(Debug, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
        label: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Segment(i8, i8),
        Rect { width: u16, height: u16 },
    }

    #[derive(Debug, Deserialize)]
    struct Meters(f32);

    #[derive(Debug, Deserialize)]
    struct Marker;

    #[test]
    fn test_factories_share_the_path() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let path = Path::root().key("outer");
        let mut context = ArbitraryDeserializer::new(Composer::new(&mut rng, &config), path.clone());

        assert_eq!(context.object_container(ObjectKind::Map).path(), &path);
        assert_eq!(context.sequence_container().path(), &path);
        assert_eq!(context.scalar_container().path(), &path);
        assert_eq!(context.path(), &path);
    }

    #[test]
    fn test_derives_plain_struct() {
        for point in derive_many::<Point>(50) {
            assert!(point.label.chars().count() <= 20);
            let _ = (point.x, point.y);
        }
    }

    #[test]
    fn test_derives_every_enum_variant() {
        let shapes = derive_many::<Shape>(400);
        assert!(shapes.contains(&Shape::Empty));
        assert!(shapes.iter().any(|s| matches!(s, Shape::Circle(r) if (-1000.0..=1000.0).contains(r))));
        assert!(shapes.iter().any(|s| matches!(s, Shape::Segment(_, _))));
        assert!(shapes.iter().any(|s| matches!(s, Shape::Rect { .. })));
    }

    #[test]
    fn test_derives_tuples_and_arrays_with_exact_length() {
        for (a, b, c) in derive_many::<(u8, String, bool)>(50) {
            let _ = (a, b, c);
        }
        for array in derive_many::<[i16; 4]>(50) {
            assert_eq!(array.len(), 4);
        }
    }

    #[test]
    fn test_top_level_option_takes_both_arms() {
        let values = derive_many::<Option<u32>>(200);
        assert!(values.iter().any(Option::is_none));
        assert!(values.iter().any(Option::is_some));
    }

    #[test]
    fn test_top_level_sequence_and_map() {
        let lists = derive_many::<Vec<u64>>(100);
        assert!(lists.iter().all(|list| list.len() <= 100));
        assert!(lists.iter().any(|list| !list.is_empty()));

        let maps = derive_many::<BTreeMap<String, bool>>(100);
        assert!(maps.iter().any(|map| map.is_empty()));
        assert!(maps.iter().any(|map| !map.is_empty()));
        assert!(maps.iter().flat_map(|map| map.keys()).all(|key| is_valid_key(key)));
    }

    #[test]
    fn test_newtype_unit_and_bytes() {
        for meters in derive_many::<Meters>(20) {
            assert!((-1000.0..=1000.0).contains(&meters.0));
        }
        derive_many::<Marker>(5);
        derive_many::<()>(5);

        let blobs = derive_many::<serde_bytes_like::Blob>(50);
        assert!(blobs.iter().all(|blob| blob.0.len() <= 10));
    }

    #[test]
    fn test_enum_without_variants_fails() {
        #[derive(Debug, Deserialize)]
        enum Never {}

        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let result = Never::deserialize(ArbitraryDeserializer::root(Composer::new(&mut rng, &config)));
        assert!(matches!(result, Err(DeriveError::Custom(_))));
    }

    mod serde_bytes_like {
        use serde::de::{Deserialize, Deserializer, Visitor};
        use std::fmt;

        /// Asks for a byte buffer the way `serde_bytes` does
        #[derive(Debug)]
        pub struct Blob(pub Vec<u8>);

        impl<'de> Deserialize<'de> for Blob {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct BlobVisitor;

                impl<'de> Visitor<'de> for BlobVisitor {
                    type Value = Blob;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str("a byte buffer")
                    }

                    fn visit_byte_buf<E>(self, bytes: Vec<u8>) -> Result<Blob, E> {
                        Ok(Blob(bytes))
                    }
                }

                deserializer.deserialize_byte_buf(BlobVisitor)
            }
        }
    }
}
