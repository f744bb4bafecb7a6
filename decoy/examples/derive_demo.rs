//! Derive generators for a few serde types and print what they produce

use decoy::{
    Derivable, Generator, GeneratorConfig, IntGenerator, arbitrary_generator_for,
    create_seeded_rng,
};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Nested {
    bazzes: Vec<String>,
    buzzes: HashMap<String, i64>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Record {
    foo: String,
    bar: Option<i64>,
    nested: Nested,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
enum Command {
    Stop,
    Move { x: i16, y: i16 },
    Say(String),
}

fn example_1_derived_struct() {
    println!("=== Example 1: Derived struct ===");

    let generator = arbitrary_generator_for::<Record>();
    let config = GeneratorConfig::default()
        .with_max_sequence_length(4)
        .with_size_hint(3);
    let mut rng = create_seeded_rng(1);

    for _ in 0..3 {
        println!("{:#?}", generator.generate(&mut rng, &config));
    }
}

fn example_2_enums() {
    println!("\n=== Example 2: Enum variants ===");

    let generator = Command::derived_generator();
    let mut rng = create_seeded_rng(2);
    let config = GeneratorConfig::default();

    for _ in 0..5 {
        println!("{:?}", generator.generate(&mut rng, &config));
    }
}

fn example_3_combinators() {
    println!("\n=== Example 3: Combinators over derived values ===");

    let commands = arbitrary_generator_for::<Command>()
        .such_that(|command| !matches!(command, Command::Stop))
        .proliferate();
    let small = IntGenerator::new(1u8, 6).proliferate().resize(4);
    let mut rng = create_seeded_rng(3);
    let config = GeneratorConfig::default();

    println!("commands: {:?}", commands.generate(&mut rng, &config));
    println!("dice: {:?}", small.generate(&mut rng, &config));
}

fn example_4_json() {
    println!("\n=== Example 4: Self-describing values ===");

    let generator = arbitrary_generator_for::<HashMap<String, serde_json::Value>>();
    let value = generator.sample_seeded(4);
    match serde_json::to_string_pretty(&value) {
        Ok(rendered) => println!("{}", rendered),
        Err(error) => println!("could not render: {}", error),
    }
}

fn main() {
    example_1_derived_struct();
    example_2_enums();
    example_3_combinators();
    example_4_json();
}
