use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A key/value pair attached to a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Stores the `Display` rendering of `value`.
    pub fn display(key: impl Into<String>, value: &impl fmt::Display) -> Self {
        Self::new(key, value.to_string())
    }

    /// Stores the `Debug` rendering of `value`.
    pub fn debug(key: impl Into<String>, value: &impl fmt::Debug) -> Self {
        Self::new(key, format!("{value:?}"))
    }

    /// Stores an error message under the `error` key.
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", err.to_string())
    }

    /// Serializes `value` to JSON. When serialization fails the field is
    /// renamed to `<key>Error` and holds the failure message instead.
    pub fn any(key: impl Into<String>, value: &impl Serialize) -> Self {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => Self { key, value },
            Err(err) => Self::new(format!("{key}Error"), err.to_string()),
        }
    }
}
