use serde::Deserialize;
use serde_cybuf::{cybuf, from_value, to_string, CybufMap, Number, Value};

#[test]
fn test_cybuf_macro_nil() {
    assert_eq!(cybuf!(nil), Value::Nil);
    assert_eq!(to_string(&cybuf!(nil)).unwrap(), "nil");
}

#[test]
fn test_cybuf_macro_bool() {
    assert_eq!(cybuf!(true), Value::Bool(true));
    assert_eq!(cybuf!(false), Value::Bool(false));
}

#[test]
fn test_cybuf_macro_numbers() {
    assert_eq!(cybuf!(0), Value::Number(Number::Integer(0)));
    assert_eq!(cybuf!((-42)), Value::Number(Number::Integer(-42)));
    assert_eq!(cybuf!(2.5), Value::Number(Number::Float(2.5)));
    assert_eq!(cybuf!(u64::MAX), Value::Number(Number::Unsigned(u64::MAX)));
}

#[test]
fn test_cybuf_macro_strings() {
    assert_eq!(cybuf!(""), Value::String(String::new()));
    assert_eq!(cybuf!("with \"quotes\""), Value::String("with \"quotes\"".to_string()));
}

#[test]
fn test_cybuf_macro_expressions() {
    let name = "yah01".to_string();
    let ages = vec![1, 2, 3];
    let value = cybuf!({ Name: name, Ages: ages });
    assert_eq!(to_string(&value).unwrap(), "{Ages: [1 2 3] Name: \"yah01\"}");
}

#[test]
fn test_cybuf_macro_arrays() {
    assert_eq!(cybuf!([]), Value::Array(vec![]));
    let value = cybuf!([1, "two", nil, [true], {}]);
    assert_eq!(to_string(&value).unwrap(), "[1 \"two\" nil [true] {}]");
}

#[test]
fn test_cybuf_macro_objects() {
    assert_eq!(cybuf!({}), Value::Object(CybufMap::new()));

    let value = cybuf!({
        Name: "Wuhan University",
        "Age": 120,
        Campus: { City: "Wuhan" },
    });
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert_eq!(obj.get("Age").and_then(Value::as_i64), Some(120));
    let campus = obj.get("Campus").and_then(Value::as_object).unwrap();
    assert_eq!(campus.get("City").and_then(Value::as_str), Some("Wuhan"));
}

#[test]
fn test_cybuf_macro_into_struct() {
    #[derive(Deserialize, Debug, PartialEq)]
    #[allow(non_snake_case)]
    struct School {
        Name: String,
        Age: u16,
    }

    let school: School = from_value(cybuf!({ Name: "Wuhan University", Age: 120 })).unwrap();
    assert_eq!(
        school,
        School {
            Name: "Wuhan University".to_string(),
            Age: 120
        }
    );
}
