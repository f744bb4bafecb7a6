//! Core generator infrastructure and combinators.
//!
//! A [`Generator`] describes how to produce random values of one type. Generators are
//! composable: they can be mapped, filtered, resized, proliferated into lists and
//! combined into choices between alternatives.

use std::marker::PhantomData;

use rand::{Rng, RngCore};

use crate::config::GeneratorConfig;

/// Core generator trait for creating random values
pub trait Generator {
    /// The type of values this generator produces
    type Value;

    /// Generate a random value using the provided RNG and configuration
    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value;

    /// Map this generator to produce values of a different type
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Value) -> U,
    {
        Map {
            generator: self,
            mapper: f,
        }
    }

    /// Keep drawing until the predicate accepts a value
    ///
    /// Panics once `max_filter_attempts` draws have all been rejected.
    fn such_that<F>(self, predicate: F) -> SuchThat<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Value) -> bool,
    {
        SuchThat {
            generator: self,
            predicate,
        }
    }

    /// Produce lists of values, with a length drawn from `0..=size_hint`
    fn proliferate(self) -> Proliferate<Self>
    where
        Self: Sized,
    {
        Proliferate { element: self }
    }

    /// Run this generator with `size_hint` overridden
    fn resize(self, size: usize) -> Resize<Self>
    where
        Self: Sized,
    {
        Resize {
            generator: self,
            size,
        }
    }

    /// Erase the concrete generator type
    fn boxed(self) -> BoxedGenerator<Self::Value>
    where
        Self: Sized + 'static,
    {
        BoxedGenerator {
            inner: Box::new(self),
        }
    }
}

impl<G: Generator + ?Sized> Generator for &G {
    type Value = G::Value;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> G::Value {
        (**self).generate(rng, config)
    }
}

/// A type-erased generator
pub struct BoxedGenerator<T> {
    inner: Box<dyn Generator<Value = T>>,
}

impl<T> Generator for BoxedGenerator<T> {
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        self.inner.generate(rng, config)
    }
}

impl<T> std::fmt::Debug for BoxedGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedGenerator").finish_non_exhaustive()
    }
}

/// A generator that maps values from one type to another
#[derive(Debug, Clone)]
pub struct Map<G, F> {
    generator: G,
    mapper: F,
}

impl<G, F, U> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Value) -> U,
{
    type Value = U;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> U {
        (self.mapper)(self.generator.generate(rng, config))
    }
}

/// A generator that retries until a predicate holds
#[derive(Debug, Clone)]
pub struct SuchThat<G, F> {
    generator: G,
    predicate: F,
}

impl<G, F> Generator for SuchThat<G, F>
where
    G: Generator,
    F: Fn(&G::Value) -> bool,
{
    type Value = G::Value;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> G::Value {
        for _ in 0..config.max_filter_attempts {
            let value = self.generator.generate(rng, config);
            if (self.predicate)(&value) {
                return value;
            }
        }
        panic!(
            "such_that failed to generate a valid value after {} attempts",
            config.max_filter_attempts
        );
    }
}

/// A generator of lists whose length is bounded by the configured size
#[derive(Debug, Clone)]
pub struct Proliferate<G> {
    element: G,
}

impl<G: Generator> Generator for Proliferate<G> {
    type Value = Vec<G::Value>;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Vec<G::Value> {
        let length = rng.gen_range(0..=config.size_hint);
        (0..length)
            .map(|_| self.element.generate(rng, config))
            .collect()
    }
}

/// A generator that runs its inner generator at a fixed size
#[derive(Debug, Clone)]
pub struct Resize<G> {
    generator: G,
    size: usize,
}

impl<G: Generator> Generator for Resize<G> {
    type Value = G::Value;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> G::Value {
        let resized = config.clone().with_size_hint(self.size);
        self.generator.generate(rng, &resized)
    }
}

/// A generator that always produces the same value
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

impl<T: Clone> Generator for Just<T> {
    type Value = T;

    fn generate(&self, _rng: &mut dyn RngCore, _config: &GeneratorConfig) -> T {
        self.value.clone()
    }
}

/// A generator that picks uniformly from a fixed collection of values
#[derive(Debug, Clone)]
pub struct Elements<T> {
    values: Vec<T>,
}

impl<T: Clone> Generator for Elements<T> {
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> T {
        let index = rng.gen_range(0..self.values.len());
        self.values[index].clone()
    }
}

/// A generator that picks uniformly between alternative generators
#[derive(Debug)]
pub struct OneOf<T> {
    alternatives: Vec<BoxedGenerator<T>>,
}

impl<T> Generator for OneOf<T> {
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        let index = rng.gen_range(0..self.alternatives.len());
        self.alternatives[index].generate(rng, config)
    }
}

/// A generator that picks between alternatives in proportion to their weights
#[derive(Debug)]
pub struct Frequency<T> {
    alternatives: Vec<(u32, BoxedGenerator<T>)>,
    total_weight: u32,
}

impl<T> Generator for Frequency<T> {
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        let mut pick = rng.gen_range(0..self.total_weight);
        for (weight, generator) in &self.alternatives {
            if pick < *weight {
                return generator.generate(rng, config);
            }
            pick -= weight;
        }
        unreachable!("pick is always below the total weight")
    }
}

/// Chooses uniformly between absence and a value drawn from the inner generator
#[derive(Debug, Clone)]
pub struct Optional<G> {
    generator: G,
}

impl<G: Generator> Generator for Optional<G> {
    type Value = Option<G::Value>;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Option<G::Value> {
        if rng.r#gen::<bool>() {
            Some(self.generator.generate(rng, config))
        } else {
            None
        }
    }
}

/// A generator built from a closure over the RNG and configuration
pub struct FromFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> Generator for FromFn<F, T>
where
    F: Fn(&mut dyn RngCore, &GeneratorConfig) -> T,
{
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        (self.f)(rng, config)
    }
}

/// Create a generator that always produces the same value
pub fn just<T: Clone>(value: T) -> Just<T> {
    Just { value }
}

/// Create a generator that picks uniformly from `values`
pub fn elements<T: Clone>(values: Vec<T>) -> Elements<T> {
    if values.is_empty() {
        panic!("elements cannot be created with empty values");
    }
    Elements { values }
}

/// Create a generator that picks uniformly between `alternatives`
pub fn one_of<T>(alternatives: Vec<BoxedGenerator<T>>) -> OneOf<T> {
    if alternatives.is_empty() {
        panic!("one_of cannot be created without alternatives");
    }
    OneOf { alternatives }
}

/// Create a generator that picks between weighted `alternatives`
pub fn frequency<T>(alternatives: Vec<(u32, BoxedGenerator<T>)>) -> Frequency<T> {
    let total_weight = alternatives.iter().map(|(weight, _)| *weight).sum();
    if total_weight == 0 {
        panic!("frequency needs at least one alternative with a positive weight");
    }
    Frequency {
        alternatives,
        total_weight,
    }
}

/// Create a generator of `Option`s over `generator`
pub fn optional<G: Generator>(generator: G) -> Optional<G> {
    Optional { generator }
}

/// Create a generator from a closure
pub fn from_fn<F, T>(f: F) -> FromFn<F, T>
where
    F: Fn(&mut dyn RngCore, &GeneratorConfig) -> T,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}
