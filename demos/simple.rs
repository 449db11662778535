//! Basic CyBuf serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_cybuf::{from_str, to_string, to_string_indented};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq, Default)]
#[allow(non_snake_case)]
#[serde(default)]
struct People {
    Name: String,
    Age: i32,
    Weight: f64,
    Live: bool,
    Friends: Vec<People>,
    School: School,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Default)]
#[allow(non_snake_case)]
#[serde(default)]
struct School {
    Name: String,
    Age: i32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let people = People {
        Name: "yah01".to_string(),
        Age: 21,
        Weight: 100.2,
        Live: true,
        Friends: vec![People {
            Name: "wmx".to_string(),
            Age: 100,
            Weight: 200.5,
            ..People::default()
        }],
        School: School {
            Name: "Wuhan University".to_string(),
            Age: 120,
        },
    };

    let compact = to_string(&people)?;
    println!("Compact:\n{}\n", compact);

    let indented = to_string_indented(&people)?;
    println!("Indented:\n{}\n", indented);

    let back: People = from_str(&indented)?;
    assert_eq!(people, back);
    println!("✓ Round-trip successful");

    match from_str::<People>("{Name: \"yah01\" Age: \"twenty-one\"}") {
        Ok(_) => unreachable!("a string cannot become an integer"),
        Err(e) => println!("Decoding a bad document fails with: {}", e),
    }

    Ok(())
}
