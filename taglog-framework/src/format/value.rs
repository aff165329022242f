use regex::Regex;
use std::{cell::RefCell, rc::Rc};

/// shared, interior-mutable storage so structures can refer to themselves
pub type Shared<T> = Rc<RefCell<T>>;

/// anything a caller can hand to a print call
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Regex { source: String, flags: String },
    /// a callable, optionally named
    Function(Option<String>),
    /// a class/type object, optionally named
    Class(Option<String>),
    Array(Shared<Vec<Value>>),
    Object(Shared<Vec<(String, Value)>>),
}

impl Value {
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )))
    }

    pub fn regex(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::Regex {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Some(name.into()))
    }

    pub fn anonymous_function() -> Self {
        Value::Function(None)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Value::Class(Some(name.into()))
    }

    /// set a key on an object, replacing an existing entry in place;
    /// returns false for anything that is not an object
    pub fn set(&self, key: impl Into<String>, value: Value) -> bool {
        let Value::Object(entries) = self else {
            return false;
        };
        let key = key.into();
        let mut entries = entries.borrow_mut();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => entries.push((key, value)),
        }
        true
    }

    /// append to an array; returns false for anything that is not an array
    pub fn push(&self, value: Value) -> bool {
        let Value::Array(items) = self else {
            return false;
        };
        items.borrow_mut().push(value);
        true
    }

    /// values that a message composition drops entirely
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null | Value::Bool(false))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(value as i64)
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32, isize);

// wider unsigned values that do not fit an i64 fall back to a float
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Value::Float(value as f64), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&Regex> for Value {
    fn from(value: &Regex) -> Self {
        Value::regex(value.as_str(), "")
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::array(value.into_iter().map(Into::into))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(key, value)| (key, Value::from(value))))
            }
        }
    }
}

/// build a `[Value; N]` from heterogeneous expressions
///
/// ```
/// use taglog_framework::{Value, values};
///
/// let parts = values!["answer", 42, false, None::<&str>];
/// assert!(matches!(parts[1], Value::Int(42)));
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        [$($crate::Value::from($value)),*]
    };
}
