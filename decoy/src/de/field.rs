use serde::de::{Deserializer, Visitor};

use crate::arbitrary::Arbitrary;
use crate::error::DeriveError;
use crate::generator::Generator;

use super::ObjectContainer;

/// Decodes the value stored under one key of an object container
///
/// Required requests are checked against the container's key set first, so a key
/// outside an enumerated set fails with `KeyNotFound` whatever shape the consumer asks
/// for. Optional values skip the check and draw their present/absent arm directly, and
/// ignored values are never looked up.
pub(super) struct FieldDeserializer<'f, 'c> {
    container: &'f mut ObjectContainer<'c>,
    key: &'f str,
}

impl<'f, 'c> FieldDeserializer<'f, 'c> {
    pub(super) fn new(container: &'f mut ObjectContainer<'c>, key: &'f str) -> Self {
        Self { container, key }
    }
}

macro_rules! deserialize_required {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, DeriveError>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.container.decode_required::<$ty>(self.key)?)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for FieldDeserializer<'_, '_> {
    type Error = DeriveError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        if self.container.decode_nil(self.key) {
            return visitor.visit_unit();
        }
        self.container.scalar_container_for(self.key)?.visit_untyped(visitor)
    }

    deserialize_required! {
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

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        let bytes = self
            .container
            .decode_required_with(self.key, &u8::arbitrary().proliferate())?;
        visitor.visit_byte_buf(bytes)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        match self.container.optional_context(self.key) {
            Some(context) => visitor.visit_some(context),
            None => visitor.visit_none(),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.container.require(self.key)?;
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
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self.container.delegate_context_for(self.key)?)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(self.container.nested_sequence_container(self.key)?)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(self.container.nested_tuple_container(self.key, len)?)
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

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(
            self.container
                .nested_object_container(self.key, super::ObjectKind::Map)?,
        )
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(
            self.container
                .nested_object_container(self.key, super::ObjectKind::Struct(fields))?,
        )
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.container
            .delegate_context_for(self.key)?
            .deserialize_enum(name, variants, visitor)
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
    use crate::composer::Composer;
    use crate::config::GeneratorConfig;
    use crate::path::Path;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Inner {
        flag: bool,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    enum Mode {
        Fast,
        Slow(u8),
    }

    fn with_missing_key<T>(seed: u64) -> Result<T, DeriveError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut object = ObjectContainer::with_enumerated_keys(
            Composer::new(&mut rng, &config),
            Path::root(),
            ["present"],
        );
        T::deserialize(FieldDeserializer::new(&mut object, "absent"))
    }

    #[test]
    fn test_every_required_shape_checks_the_key() {
        assert!(matches!(with_missing_key::<u32>(1), Err(DeriveError::KeyNotFound { .. })));
        assert!(matches!(with_missing_key::<String>(2), Err(DeriveError::KeyNotFound { .. })));
        assert!(matches!(with_missing_key::<Vec<u8>>(3), Err(DeriveError::KeyNotFound { .. })));
        assert!(matches!(with_missing_key::<(u8, u8)>(4), Err(DeriveError::KeyNotFound { .. })));
        assert!(matches!(with_missing_key::<Inner>(5), Err(DeriveError::KeyNotFound { .. })));
        assert!(matches!(with_missing_key::<Mode>(6), Err(DeriveError::KeyNotFound { .. })));
        assert!(matches!(with_missing_key::<()>(7), Err(DeriveError::KeyNotFound { .. })));
    }

    #[test]
    fn test_optional_shape_tolerates_missing_keys() {
        for seed in 0..50 {
            assert!(with_missing_key::<Option<u32>>(seed).is_ok());
        }
    }

    #[test]
    fn test_present_key_decodes_nested_values() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut object = ObjectContainer::with_enumerated_keys(
            Composer::new(&mut rng, &config),
            Path::root(),
            ["inner"],
        );

        let inner = Inner::deserialize(FieldDeserializer::new(&mut object, "inner")).unwrap();
        let _ = inner.flag;
        let list = Vec::<i8>::deserialize(FieldDeserializer::new(&mut object, "inner")).unwrap();
        assert!(list.len() <= 100);
        let pair = <(u8, bool)>::deserialize(FieldDeserializer::new(&mut object, "inner")).unwrap();
        let _ = pair;
    }

    #[test]
    fn test_ignored_values_skip_the_key_check() {
        assert!(with_missing_key::<serde::de::IgnoredAny>(8).is_ok());
    }
}
