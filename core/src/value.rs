//! Dynamically typed column values.
//!
//! [`Value`] carries statement parameters out of an entity and result
//! columns back into one. [`IntoValue`] and [`FromValue`] connect it to the
//! Rust types an entity attribute may have.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A single parameter or column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Uint64(u64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Uint64(_) => "uint64",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::DateTime(_) => "datetime",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{v}"),
        }
    }
}

/// Conversion from an attribute into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion from a [`Value`] into an attribute.
pub trait FromValue: Sized {
    /// Human-readable name of the expected value, for error messages.
    const EXPECTED: &'static str;

    /// Returns `None` when the value cannot represent `Self`.
    fn from_value(value: &Value) -> Option<Self>;
}

/// Converts `value` for the named attribute, reporting a
/// [`ModelError::TypeMismatch`] on failure.
///
/// Used by [`Entity::set`](crate::Entity::set) implementations.
pub fn convert<T: FromValue>(attribute: &str, value: &Value) -> Result<T> {
    T::from_value(value).ok_or_else(|| ModelError::TypeMismatch {
        attribute: attribute.to_string(),
        expected: T::EXPECTED.to_string(),
        found: value.kind().to_string(),
    })
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

macro_rules! int_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }

            impl FromValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(*v).ok(),
                        Value::Uint64(v) => <$ty>::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, isize, u8, u16, u32);

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        Value::Uint64(self)
    }
}

impl FromValue for u64 {
    const EXPECTED: &'static str = "u64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uint64(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "f32";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v as f32),
            Value::Int(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "String";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::DateTime(self)
    }
}

impl FromValue for NaiveDateTime {
    const EXPECTED: &'static str = "NaiveDateTime";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
