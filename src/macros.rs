/// Builds a [`Value`](crate::Value) from CyBuf-like syntax.
///
/// Object keys may be written as barewords or as string literals. Anything
/// else in value position is converted with [`to_value`](crate::to_value),
/// so negative numbers need parentheses: `(-1)`.
///
/// ```rust
/// use serde_cybuf::{cybuf, to_string};
///
/// let school = cybuf!({
///     Name: "Wuhan University",
///     Age: 120,
///     Tags: ["old", nil]
/// });
/// assert_eq!(
///     to_string(&school).unwrap(),
///     "{Age: 120 Name: \"Wuhan University\" Tags: [\"old\" nil]}"
/// );
/// ```
#[macro_export]
macro_rules! cybuf {
    (nil) => {
        $crate::Value::Nil
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::cybuf!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::CybufMap::new())
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let mut object = $crate::CybufMap::new();
        $(
            object.insert($crate::cybuf!(@key $key), $crate::cybuf!($value));
        )*
        $crate::Value::Object(object)
    }};

    (@key $key:ident) => {
        stringify!($key).to_string()
    };

    (@key $key:literal) => {
        $key.to_string()
    };

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Nil)
    };
}
