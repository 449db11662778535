//! CyBuf vs JSON output size for the same data.
//!
//! Run with: cargo run --example size_comparison

use serde::Serialize;
use serde_cybuf::{to_string, to_string_indented};
use std::error::Error;

#[derive(Serialize)]
#[allow(non_snake_case)]
struct People {
    Name: String,
    Age: i32,
    Weight: f64,
    Live: bool,
    Friends: Vec<People>,
}

fn compare<T: Serialize>(label: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let cybuf = to_string(value)?;
    let json = serde_json::to_string(value)?;
    let cybuf_indented = to_string_indented(value)?;
    let json_pretty = serde_json::to_string_pretty(value)?;

    println!("{}", label);
    println!("  compact:  cybuf {:>5} bytes, json {:>5} bytes", cybuf.len(), json.len());
    println!(
        "  indented: cybuf {:>5} bytes, json {:>5} bytes",
        cybuf_indented.len(),
        json_pretty.len()
    );
    println!(
        "  saving:   {:.1}%\n",
        100.0 * (1.0 - cybuf.len() as f64 / json.len() as f64)
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let single = People {
        Name: "yah01".to_string(),
        Age: 21,
        Weight: 100.2,
        Live: true,
        Friends: vec![],
    };
    compare("Single record", &single)?;

    let crowd: Vec<People> = (0..100)
        .map(|i| People {
            Name: format!("person{}", i),
            Age: 20 + i % 50,
            Weight: 50.0 + f64::from(i) / 4.0,
            Live: i % 3 != 0,
            Friends: vec![People {
                Name: format!("friend{}", i),
                Age: 30,
                Weight: 70.5,
                Live: true,
                Friends: vec![],
            }],
        })
        .collect();
    compare("100 records with one friend each", &crowd)?;

    println!("Compact CyBuf for the single record:\n{}", to_string(&single)?);
    Ok(())
}
