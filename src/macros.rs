/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Object fields keep the order in which they are written.
///
/// # Examples
///
/// ```rust
/// use jtree::{value, Value};
///
/// let doc = value!({
///     "user": { "id": 1, "tags": [1, 2] }
/// });
/// assert!(doc.as_object().unwrap().get("user").unwrap().is_object());
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({ $($field:literal : $value:tt),* $(,)? }) => {{
        let fields: Vec<(String, $crate::Value)> =
            vec![$(($field.to_string(), $crate::value!($value))),*];
        $crate::Value::Object(fields.into_iter().collect())
    }};

    // booleans, numbers, strings and prebuilt values
    ($scalar:expr) => {
        $crate::Value::from($scalar)
    };
}
