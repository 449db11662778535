//! Property-based tests for the round-trip and determinism guarantees.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_cybuf::{
    from_str, parse, to_string, to_string_indented, to_string_with_options, CybufMap,
    CybufOptions, Separator, Value,
};
use std::collections::HashMap;

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

fn key() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

/// Arbitrary values nesting up to six levels deep.
fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e12f64..1.0e12).prop_map(Value::from),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(6, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<CybufMap>())),
        ]
    })
}

/// Floats come back as integers when they are whole, so compare numerically.
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same(x, y)))
        }
        _ => a == b,
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[allow(non_snake_case)]
struct Person {
    Name: String,
    Age: u8,
    Weight: f64,
    Live: bool,
    Friends: Vec<Person>,
}

fn person() -> impl Strategy<Value = Person> {
    let leaf = (any::<String>(), any::<u8>(), -500.0f64..500.0, any::<bool>()).prop_map(
        |(name, age, weight, live)| Person {
            Name: name,
            Age: age,
            Weight: weight,
            Live: live,
            Friends: vec![],
        },
    );
    leaf.prop_recursive(5, 32, 3, |inner| {
        (inner.clone(), prop::collection::vec(inner, 0..3)).prop_map(|(mut p, friends)| {
            p.Friends = friends;
            p
        })
    })
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_option_vec(v in proptest::option::of(prop::collection::vec(any::<i32>(), 0..20))) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_nested_struct(p in person()) {
        prop_assert!(roundtrip(&p));
        let indented = to_string_indented(&p).unwrap();
        prop_assert_eq!(from_str::<Person>(&indented).unwrap(), p);
    }

    #[test]
    fn prop_value_roundtrip(v in value()) {
        let text = to_string(&v).unwrap();
        let back: Value = from_str(&text).unwrap();
        prop_assert!(same(&v, &back), "{} decoded as {:?}", text, back);
    }

    #[test]
    fn prop_formatting_does_not_change_the_tree(v in value()) {
        let compact = parse(&to_string(&v).unwrap()).unwrap();
        let indented = parse(&to_string_indented(&v).unwrap()).unwrap();
        let tabbed = parse(
            &to_string_with_options(&v, &CybufOptions::new().with_separator(Separator::Tab)).unwrap(),
        )
        .unwrap();
        prop_assert_eq!(&compact, &indented);
        prop_assert_eq!(&compact, &tabbed);
    }

    #[test]
    fn prop_map_encoding_is_deterministic(entries in prop::collection::vec((key(), any::<i32>()), 0..20)) {
        let forward: HashMap<String, i32> = entries.iter().cloned().collect();
        let backward: HashMap<String, i32> = entries.iter().rev().cloned().collect();
        // Reversal changes which duplicate wins, so only compare distinct keys.
        let distinct = forward.len() == entries.len();
        if distinct {
            prop_assert_eq!(to_string(&forward).unwrap(), to_string(&backward).unwrap());
        }
        let text = to_string(&forward).unwrap();
        let tree = parse(&text).unwrap();
        prop_assert_eq!(to_string(&tree.to_value(tree.root())).unwrap(), text);
    }
}
