//! Customizing CyBuf output with CybufOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_cybuf::{from_str, to_string_with_options, CybufOptions, Indent, Separator};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    version: String,
    debug: bool,
    ports: Vec<u16>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        debug: true,
        ports: vec![8080, 8443],
    };

    let variants = [
        ("Default (space)", CybufOptions::new()),
        ("Tab separator", CybufOptions::new().with_separator(Separator::Tab)),
        ("Newline separator", CybufOptions::new().with_separator(Separator::Newline)),
        ("Indented with tabs", CybufOptions::indented()),
        ("Indented with two spaces", CybufOptions::new().with_indent(Indent::Spaces(2))),
    ];

    for (label, options) in &variants {
        let text = to_string_with_options(&config, options)?;
        println!("{}:\n{}\n", label, text);

        // Every layout reads back to the same value.
        let back: Config = from_str(&text)?;
        assert_eq!(config, back);
    }

    let shallow = CybufOptions::new().with_recursion_limit(1);
    match to_string_with_options(&config, &shallow) {
        Ok(text) => println!("Unexpectedly encoded: {}", text),
        Err(e) => println!("Recursion limit of 1: {}", e),
    }

    Ok(())
}
