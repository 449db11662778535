//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_cybuf::{cybuf, from_str, from_value, to_string_indented, to_value, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with cybuf! macro
    let config = cybuf!({
        host: "localhost",
        port: 8080,
        features: ["auth", "logging", "metrics"],
        debug: true,
        proxy: nil
    });

    println!("Config as CyBuf:\n{}\n", to_string_indented(&config)?);

    if let Value::Object(obj) = &config {
        if let Some(host) = obj.get("host").and_then(Value::as_str) {
            println!("host: {}", host);
        }
        if let Some(port) = obj.get("port").and_then(Value::as_i64) {
            println!("port: {}", port);
        }
        if let Some(features) = obj.get("features").and_then(Value::as_array) {
            println!("features: {} items", features.len());
        }
        println!("proxy is nil: {}\n", obj.get("proxy").is_some_and(Value::is_nil));
    }

    // Parse a document whose shape is not known ahead of time
    let doc: Value = from_str("{Name: \"cybuf\" Friends: [{Name: \"Zerone\" Phone: 1010101}]}")?;
    println!("Parsed document kind: {}", doc.kind());
    println!("Re-rendered compactly: {}\n", doc);

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let mut user_value = to_value(&user)?;
    if let Value::Object(obj) = &mut user_value {
        obj.insert("id".to_string(), Value::from(124));
    }
    let edited: User = from_value(user_value)?;
    println!("Edited user: {:?}", edited);

    Ok(())
}
