use serde::{Deserialize, Serialize};
use serde_cybuf::{
    from_slice, from_str, from_value, to_string, to_string_indented, to_string_with_options,
    to_value, to_vec, CybufOptions, Error, Indent, Number, Separator, Value,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

fn sample_order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.5,
                quantity: 1,
            },
        ],
        total: 109.48,
        note: None,
    }
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let text = to_string(&user).unwrap();
    println!("User CyBuf: {}", text);

    let user_back: User = from_str(&text).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let order = sample_order();
    let text = to_string(&order).unwrap();
    assert!(text.contains("note: nil"));
    assert!(text.contains("items: [{sku: \"WIDGET-001\" price: 29.99 quantity: 2} {"));

    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_indented_and_compact_decode_identically() {
    let order = sample_order();
    let compact = to_string(&order).unwrap();
    let indented = to_string_indented(&order).unwrap();
    assert_ne!(compact, indented);

    let a: Value = from_str(&compact).unwrap();
    let b: Value = from_str(&indented).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_every_separator_round_trips() {
    let order = sample_order();
    for separator in [Separator::Space, Separator::Tab, Separator::Newline] {
        let options = CybufOptions::new().with_separator(separator);
        let text = to_string_with_options(&order, &options).unwrap();
        let back: Order = from_str(&text).unwrap();
        assert_eq!(order, back, "separator {:?}", separator);
    }
}

#[test]
fn test_custom_indent() {
    let options = CybufOptions::new().with_indent(Indent::Spaces(4));
    let text = to_string_with_options(&vec![vec![1]], &options).unwrap();
    assert_eq!(text, "[\n    [\n        1\n    ]\n]");
}

#[test]
fn test_hashmap_output_is_deterministic() {
    let mut map = HashMap::new();
    for i in 0..50 {
        map.insert(format!("key{}", i), i);
    }
    let first = to_string(&map).unwrap();
    for _ in 0..10 {
        let rebuilt: HashMap<String, i32> = map.clone().into_iter().collect();
        assert_eq!(to_string(&rebuilt).unwrap(), first);
    }

    let sorted: BTreeMap<String, i32> = map.into_iter().collect();
    assert_eq!(to_string(&sorted).unwrap(), first);
}

#[test]
fn test_strings_with_special_characters() {
    let samples = vec![
        "plain".to_string(),
        String::new(),
        "with \"quotes\"".to_string(),
        "back\\slash".to_string(),
        "line\nbreak\ttab\r".to_string(),
        "{not: [a value]}".to_string(),
        "nil".to_string(),
        "42".to_string(),
        "héllo wörld 大学".to_string(),
        "\u{1}\u{7f}".to_string(),
    ];
    let text = to_string(&samples).unwrap();
    let back: Vec<String> = from_str(&text).unwrap();
    assert_eq!(samples, back);
}

#[test]
fn test_numbers() {
    let floats = vec![0.0, -0.5, 1.0, 100.2, 1e-7, 6.02e23, f64::MAX, f64::MIN_POSITIVE];
    let text = to_string(&floats).unwrap();
    let back: Vec<f64> = from_str(&text).unwrap();
    assert_eq!(floats, back);

    assert_eq!(to_string(&1.0f64).unwrap(), "1");
    assert_eq!(to_string(&i64::MIN).unwrap(), "-9223372036854775808");
    assert_eq!(from_str::<i64>("-9223372036854775808").unwrap(), i64::MIN);
    assert_eq!(from_str::<u64>(&u64::MAX.to_string()).unwrap(), u64::MAX);
}

#[test]
fn test_float_into_int_field() {
    #[derive(Deserialize, Debug)]
    struct Counter {
        n: i32,
    }

    assert_eq!(from_str::<Counter>("{n: 4.0}").unwrap().n, 4);
    let err = from_str::<Counter>("{n: 3.5}").unwrap_err();
    assert!(matches!(err, Error::Range { ref field, .. } if field == "n"));
}

#[test]
fn test_enum_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Event {
        Started,
        Progress(u8),
        Moved { x: i32, y: i32 },
        Pair(String, bool),
    }

    let events = vec![
        Event::Started,
        Event::Progress(50),
        Event::Moved { x: -1, y: 2 },
        Event::Pair("a".to_string(), true),
    ];
    let text = to_string(&events).unwrap();
    assert_eq!(
        text,
        "[\"Started\" {Progress: 50} {Moved: {x: -1 y: 2}} {Pair: [\"a\" true]}]"
    );
    let back: Vec<Event> = from_str(&text).unwrap();
    assert_eq!(events, back);
}

#[test]
fn test_to_value_and_back() {
    let order = sample_order();
    let value = to_value(&order).unwrap();
    let customer = value.as_object().unwrap().get("customer").unwrap();
    assert_eq!(
        customer.as_object().unwrap().get("id"),
        Some(&Value::Number(Number::Integer(123)))
    );

    let order_back: Order = from_value(value).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_bytes_api() {
    let user = User {
        id: 1,
        name: "b".to_string(),
        active: false,
        tags: vec![],
    };
    let bytes = to_vec(&user).unwrap();
    assert_eq!(bytes, b"{id: 1 name: \"b\" active: false tags: []}");
    let back: User = from_slice(&bytes).unwrap();
    assert_eq!(user, back);
}

#[test]
fn test_unit_and_newtype_structs() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Marker;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Meters(f64);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wrapper {
        marker: Marker,
        length: Meters,
    }

    let value = Wrapper {
        marker: Marker,
        length: Meters(2.5),
    };
    let text = to_string(&value).unwrap();
    assert_eq!(text, "{marker: nil length: 2.5}");
    assert_eq!(from_str::<Wrapper>(&text).unwrap(), value);
}

#[test]
fn test_unknown_fields_are_skipped() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Slim {
        id: u32,
    }

    let slim: Slim =
        from_str("{extra: {deep: [1 2 {x: nil}]} id: 7 more: \"text\"}").unwrap();
    assert_eq!(slim, Slim { id: 7 });
}

#[test]
fn test_missing_field_without_default_is_an_error() {
    let err = from_str::<User>("{id: 1}").unwrap_err();
    assert!(matches!(err, Error::Custom(ref msg) if msg.contains("name")));
}
