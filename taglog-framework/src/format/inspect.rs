use super::value::Value;
use crate::{styles, theme};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

#[derive(Debug, Clone, Copy)]
pub struct InspectOptions {
    pub colors: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            colors: styles::colors_enabled(),
        }
    }
}

/// render a value structurally, with no depth or length limit
pub fn inspect(value: &Value) -> String {
    inspect_with(value, InspectOptions::default())
}

pub fn inspect_with(value: &Value, options: InspectOptions) -> String {
    let mut inspector = Inspector {
        options,
        ancestors: HashSet::new(),
    };
    let mut out = String::new();
    inspector.write_value(&mut out, value);
    out
}

struct Inspector {
    options: InspectOptions,
    // containers on the current path; a hit means a cycle
    ancestors: HashSet<*const ()>,
}

impl Inspector {
    fn paint(&self, text: String, color: crossterm::style::Color) -> String {
        if self.options.colors {
            styles::fg(text, color)
        } else {
            text
        }
    }

    fn write_value(&mut self, out: &mut String, value: &Value) {
        match value {
            Value::Undefined => out.push_str(&self.paint("undefined".into(), theme::UNDEFINED_COLOR)),
            Value::Null => {
                if self.options.colors {
                    out.push_str(&styles::bold("null"));
                } else {
                    out.push_str("null");
                }
            }
            Value::Bool(b) => out.push_str(&self.paint(b.to_string(), theme::BOOLEAN_COLOR)),
            Value::Int(i) => out.push_str(&self.paint(i.to_string(), theme::NUMBER_COLOR)),
            Value::Float(f) => out.push_str(&self.paint(format_float(*f), theme::NUMBER_COLOR)),
            Value::Str(s) => out.push_str(&self.paint(quote(s), theme::STRING_COLOR)),
            Value::Regex { source, flags } => {
                out.push_str(&self.paint(format!("/{}/{}", source, flags), theme::REGEX_COLOR))
            }
            Value::Function(name) => {
                let text = match name {
                    Some(name) if !name.is_empty() => format!("[Function: {}]", name),
                    _ => "[Function (anonymous)]".to_string(),
                };
                out.push_str(&self.paint(text, theme::SPECIAL_COLOR));
            }
            Value::Class(name) => {
                let text = match name {
                    Some(name) if !name.is_empty() => format!("[class {}]", name),
                    _ => "[class (anonymous)]".to_string(),
                };
                out.push_str(&self.paint(text, theme::SPECIAL_COLOR));
            }
            Value::Array(items) => {
                let key = items.as_ptr() as *const ();
                if !self.ancestors.insert(key) {
                    out.push_str(&self.paint("[Circular]".into(), theme::SPECIAL_COLOR));
                    return;
                }
                let items = items.borrow();
                if items.is_empty() {
                    out.push_str("[]");
                } else {
                    out.push_str("[ ");
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_value(out, item);
                    }
                    out.push_str(" ]");
                }
                self.ancestors.remove(&key);
            }
            Value::Object(entries) => {
                let key = entries.as_ptr() as *const ();
                if !self.ancestors.insert(key) {
                    out.push_str(&self.paint("[Circular]".into(), theme::SPECIAL_COLOR));
                    return;
                }
                let entries = entries.borrow();
                if entries.is_empty() {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    for (i, (name, item)) in entries.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        if IDENTIFIER_RE.is_match(name) {
                            out.push_str(name);
                        } else {
                            out.push_str(&quote(name));
                        }
                        out.push_str(": ");
                        self.write_value(out, item);
                    }
                    out.push_str(" }");
                }
                self.ancestors.remove(&key);
            }
        }
    }
}

/// number rendering without a trailing `.0` and with the usual special names
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if value == 0.0 && value.is_sign_negative() {
        "-0".to_string()
    } else if value.abs() >= 1e21 || (value != 0.0 && value.abs() < 1e-6) {
        // exponent form with an explicit sign, e.g. `1e+21`, `1.5e-7`
        let text = format!("{:e}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        value.to_string()
    }
}

// single quotes unless the text has them; escaping only when all three occur
fn quote(text: &str) -> String {
    let delimiter = if !text.contains('\'') {
        '\''
    } else if !text.contains('"') {
        '"'
    } else if !text.contains('`') {
        '`'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &Value) -> String {
        inspect_with(value, InspectOptions { colors: false })
    }

    #[test]
    fn test_scalars() {
        assert_eq!(plain(&Value::Null), "null");
        assert_eq!(plain(&Value::Undefined), "undefined");
        assert_eq!(plain(&Value::Bool(true)), "true");
        assert_eq!(plain(&Value::Int(-3)), "-3");
        assert_eq!(plain(&Value::Float(1.5)), "1.5");
        assert_eq!(plain(&Value::Float(2.0)), "2");
        assert_eq!(plain(&Value::Float(f64::NAN)), "NaN");
        assert_eq!(plain(&Value::Float(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn test_nested_strings_are_quoted() {
        assert_eq!(plain(&Value::from("hi")), "'hi'");
        assert_eq!(plain(&Value::from("it's")), "\"it's\"");
        assert_eq!(plain(&Value::from("a\nb")), "'a\\nb'");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(plain(&Value::Float(1e21)), "1e+21");
        assert_eq!(plain(&Value::Float(1.5e22)), "1.5e+22");
        assert_eq!(plain(&Value::Float(1e-7)), "1e-7");
        assert_eq!(plain(&Value::Float(-2.5e-8)), "-2.5e-8");
        assert_eq!(plain(&Value::Float(1e20)), "100000000000000000000");
        assert_eq!(plain(&Value::Float(0.000001)), "0.000001");
    }

    #[test]
    fn test_quote_delimiter_choice() {
        assert_eq!(plain(&Value::from("say \"hi\"")), "'say \"hi\"'");
        assert_eq!(plain(&Value::from("it's \"x\"")), "`it's \"x\"`");
        assert_eq!(plain(&Value::from("it's \"x\" `y`")), "'it\\'s \"x\" `y`'");
    }

    #[test]
    fn test_functions_and_classes() {
        assert_eq!(plain(&Value::function("a")), "[Function: a]");
        assert_eq!(plain(&Value::anonymous_function()), "[Function (anonymous)]");
        assert_eq!(plain(&Value::class("A")), "[class A]");
    }

    #[test]
    fn test_regex_literal() {
        assert_eq!(plain(&Value::regex("hello", "gm")), "/hello/gm");
    }

    #[test]
    fn test_object_and_array() {
        let value = Value::object([
            ("message", Value::from("hello")),
            ("say", Value::function("say")),
            ("list", Value::array([Value::Int(1), Value::Int(2)])),
            ("content-type", Value::Null),
        ]);
        assert_eq!(
            plain(&value),
            "{ message: 'hello', say: [Function: say], list: [ 1, 2 ], 'content-type': null }"
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(plain(&Value::object(Vec::<(String, Value)>::new())), "{}");
        assert_eq!(plain(&Value::array([])), "[]");
    }

    #[test]
    fn test_cycle_is_marked() {
        let obj = Value::object([("a", Value::Int(1))]);
        obj.set("self", obj.clone());
        assert_eq!(plain(&obj), "{ a: 1, self: [Circular] }");
    }

    #[test]
    fn test_shared_sibling_is_not_a_cycle() {
        let shared = Value::array([Value::Int(1)]);
        let value = Value::array([shared.clone(), shared]);
        assert_eq!(plain(&value), "[ [ 1 ], [ 1 ] ]");
    }

    #[test]
    fn test_no_truncation_for_large_or_deep_values() {
        let large = Value::array((0..500).map(Value::from));
        let rendered = plain(&large);
        assert!(rendered.ends_with("498, 499 ]"));

        let mut deep = Value::Int(0);
        for _ in 0..50 {
            deep = Value::object([("n", deep)]);
        }
        let rendered = plain(&deep);
        assert_eq!(rendered.matches("n: ").count(), 50);
        assert!(rendered.contains("n: 0"));
    }
}
