//! Turning heterogeneous values into one display string.
//!
//! Two entry points share the same stringification rules:
//!
//! - [`compose`]: the print path. Drops `false`, `null` and `undefined`, renders
//!   strings and numbers literally, everything else through [`inspect`], and joins
//!   the non-empty pieces with a single space.
//! - [`merge_strings_with_values`]: the tag path. Interleaves literal template
//!   segments with stringified values, optionally behind a prefix.

mod inspect;
mod value;

pub use inspect::{InspectOptions, inspect, inspect_with};
pub use value::{Shared, Value};

use itertools::Itertools;

/// stringify a single interpolated value: strings verbatim, the rest inspected
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => inspect(other),
    }
}

/// render one print call's values into a single message
pub fn compose(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => inspect::format_float(*f),
            blank if blank.is_blank() => String::new(),
            other => stringify(other),
        })
        .filter(|segment| !segment.is_empty())
        .join(" ")
}

/// interleave template segments with stringified values
///
/// `strings` always has one more element than the placeholders between them;
/// values past the last placeholder are appended, each after a single space.
pub fn merge_strings_with_values(
    prefix: Option<&dyn Fn() -> String>,
    strings: &[&str],
    values: &[Value],
) -> String {
    let mut out = String::new();
    if let Some(prefix) = prefix {
        out.push_str(&prefix());
    }

    let mut values_iter = values.iter();
    for (i, segment) in strings.iter().enumerate() {
        out.push_str(segment);
        if i + 1 < strings.len()
            && let Some(value) = values_iter.next()
        {
            out.push_str(&stringify(value));
        }
    }

    for value in values_iter {
        let rendered = stringify(value);
        if !rendered.is_empty() {
            out.push(' ');
            out.push_str(&rendered);
        }
    }

    out
}
