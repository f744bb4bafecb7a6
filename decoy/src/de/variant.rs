use serde::de::value::StrDeserializer;
use serde::de::{DeserializeSeed, EnumAccess, Error as _, IntoDeserializer, VariantAccess, Visitor};
use tracing::trace;

use crate::composer::Composer;
use crate::error::DeriveError;
use crate::generator::elements;
use crate::path::Path;

use super::{ArbitraryDeserializer, ObjectContainer, ObjectKind, SequenceContainer};

/// Pick one of `variants` uniformly and hand it to the consumer's enum visitor
pub(super) fn visit_enum<'de, V>(
    mut composer: Composer<'_>,
    path: Path,
    variants: &'static [&'static str],
    visitor: V,
) -> Result<V::Value, DeriveError>
where
    V: Visitor<'de>,
{
    if variants.is_empty() {
        return Err(DeriveError::custom(format!(
            "enum at {path} has no variants to choose from"
        )));
    }
    let variant = composer.generate_with(&elements(variants.to_vec()));
    trace!(%path, variant, "chose variant");
    visitor.visit_enum(VariantContext {
        composer,
        path: path.key(variant),
        variant,
    })
}

/// The chosen variant, decoded at `path.variant`
struct VariantContext<'c> {
    composer: Composer<'c>,
    path: Path,
    variant: &'static str,
}

impl<'de, 'c> EnumAccess<'de> for VariantContext<'c> {
    type Error = DeriveError;
    type Variant = Self;

    fn variant_seed<S>(self, seed: S) -> Result<(S::Value, Self), DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        let name: StrDeserializer<'_, DeriveError> = self.variant.into_deserializer();
        let value = seed.deserialize(name)?;
        Ok((value, self))
    }
}

impl<'de> VariantAccess<'de> for VariantContext<'_> {
    type Error = DeriveError;

    fn unit_variant(self) -> Result<(), DeriveError> {
        Ok(())
    }

    fn newtype_variant_seed<S>(self, seed: S) -> Result<S::Value, DeriveError>
    where
        S: DeserializeSeed<'de>,
    {
        seed.deserialize(ArbitraryDeserializer::new(self.composer, self.path))
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(SequenceContainer::exact(self.composer, self.path, len))
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeriveError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(ObjectContainer::new(
            self.composer,
            self.path,
            ObjectKind::Struct(fields),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Deserialize;
    use std::collections::HashSet;

    #[derive(Debug, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
    enum Direction {
        North,
        East,
        South,
        West,
    }

    #[derive(Debug, Deserialize)]
    enum Event {
        Moved { to: Direction, steps: u8 },
    }

    #[test]
    fn test_variants_are_chosen_uniformly_enough() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(31);

        let seen: HashSet<Direction> = (0..200)
            .map(|_| {
                Direction::deserialize(ArbitraryDeserializer::root(Composer::new(&mut rng, &config)))
                    .unwrap()
            })
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_struct_variant_fields_are_decoded() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(32);

        for _ in 0..20 {
            let event =
                Event::deserialize(ArbitraryDeserializer::root(Composer::new(&mut rng, &config)))
                    .unwrap();
            let Event::Moved { to, steps } = event;
            let _ = (to, steps);
        }
    }

    #[test]
    fn test_empty_variant_list_is_an_error() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(33);
        let result = visit_enum(
            Composer::new(&mut rng, &config),
            Path::root().key("mode"),
            &[],
            serde::de::IgnoredAny,
        );
        assert!(matches!(
            result,
            Err(DeriveError::Custom(ref message))
                if message == "enum at mode has no variants to choose from"
        ));
    }
}
