use std::fmt::Display;
use std::str::FromStr;

use serde::de::value::StrDeserializer;
use serde::de::{Deserializer, Error as _, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use tracing::trace;

use crate::arbitrary::Arbitrary;
use crate::composer::Composer;
use crate::error::DeriveError;
use crate::generator::{Generator, elements, just};
use crate::path::Path;

use super::is_valid_key;

/// Hands an already enumerated key to the consumer's key type
///
/// Enumerated keys are text. Consumers that key by numbers, booleans or chars get the
/// text parsed, and keys that do not parse fail with `InvalidKey`.
pub(super) struct KeyDeserializer<'k> {
    key: &'k str,
    path: &'k Path,
}

impl<'k> KeyDeserializer<'k> {
    pub(super) fn new(key: &'k str, path: &'k Path) -> Self {
        Self { key, path }
    }

    fn parse<T>(&self) -> Result<T, DeriveError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.key.parse().map_err(|error: T::Err| DeriveError::InvalidKey {
            key: self.key.to_string(),
            path: self.path.clone(),
            reason: error.to_string(),
        })
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, DeriveError>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>()?)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for KeyDeserializer<'_> {
    type Error = DeriveError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    deserialize_parsed! {
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

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        let variant: StrDeserializer<'_, DeriveError> = self.key.into_deserializer();
        visitor.visit_enum(variant)
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// A key drawn by [`KeyDrawer`], in the text form the container memoizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DrawnKey {
    pub(super) text: String,
    /// False once no unused key could be found within the filter budget
    pub(super) fresh: bool,
}

/// Draws a fresh map key from the distribution of whatever key type the consumer asks for
///
/// Keys already in `taken` are redrawn up to `max_filter_attempts` times. A key type
/// whose values run out, such as `bool`, ends up handing back a repeat, which the
/// drawer reports as not fresh.
pub(super) struct KeyDrawer<'a, 'c> {
    composer: Composer<'c>,
    path: &'a Path,
    taken: &'a [String],
    drawn: &'a mut Option<DrawnKey>,
}

impl<'a, 'c> KeyDrawer<'a, 'c> {
    pub(super) fn new(
        composer: Composer<'c>,
        path: &'a Path,
        taken: &'a [String],
        drawn: &'a mut Option<DrawnKey>,
    ) -> Self {
        Self {
            composer,
            path,
            taken,
            drawn,
        }
    }

    fn draw_fresh<G, F>(&mut self, generator: &G, render: F) -> G::Value
    where
        G: Generator + ?Sized,
        F: Fn(&G::Value) -> String,
    {
        let attempts = self.composer.config().max_filter_attempts.max(1);
        let mut value = self.composer.generate_with(generator);
        let mut text = render(&value);
        for _ in 1..attempts {
            if !self.taken.contains(&text) {
                break;
            }
            value = self.composer.generate_with(generator);
            text = render(&value);
        }
        let fresh = !self.taken.contains(&text);
        if !fresh {
            trace!(path = %self.path, key = %text, "key space exhausted");
        }
        *self.drawn = Some(DrawnKey { text, fresh });
        value
    }

    fn composite(&self, shape: &str) -> DeriveError {
        DeriveError::InvalidKey {
            key: shape.to_string(),
            path: self.path.clone(),
            reason: "only scalar keys can be drawn".to_string(),
        }
    }
}

macro_rules! deserialize_drawn {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
            where
                V: Visitor<'de>,
            {
                let value = self.draw_fresh(&<$ty>::arbitrary(), |value| value.to_string());
                visitor.$visit(value)
            }
        )*
    };
}

macro_rules! reject_composite {
    ($($method:ident($($arg:ident: $ty:ty),*) => $shape:literal),* $(,)?) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* _visitor: V) -> Result<V::Value, DeriveError>
            where
                V: Visitor<'de>,
            {
                Err(self.composite($shape))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for KeyDrawer<'_, '_> {
    type Error = DeriveError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    deserialize_drawn! {
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
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        let candidates = String::arbitrary().such_that(|key: &String| is_valid_key(key));
        let key = self.draw_fresh(&candidates, String::clone);
        visitor.visit_string(key)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(mut self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.draw_fresh(&just(()), |_| "()".to_string());
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
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        mut self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        if variants.is_empty() {
            return Err(DeriveError::custom(format!(
                "enum key at {} has no variants to choose from",
                self.path
            )));
        }
        let variant = self.draw_fresh(&elements(variants.to_vec()), |name| name.to_string());
        let variant: StrDeserializer<'_, DeriveError> = variant.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    reject_composite! {
        deserialize_bytes() => "bytes",
        deserialize_byte_buf() => "bytes",
        deserialize_seq() => "sequence",
        deserialize_tuple(_len: usize) => "tuple",
        deserialize_tuple_struct(_name: &'static str, _len: usize) => "tuple",
        deserialize_map() => "map",
        deserialize_struct(_name: &'static str, _fields: &'static [&'static str]) => "struct",
    }
}
