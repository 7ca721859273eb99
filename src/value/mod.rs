// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dynamic values threaded through steps and pipelines.
//!
//! Transformations are heterogeneous: a pipeline may start with text, turn it
//! into bytes, hash it and finish with a hex string. [`Value`] is the closed set
//! of shapes any stage can receive or produce.

mod arguments;
mod sealed;

pub use arguments::{Arguments, IntoPositional, NamedArgs};
pub use sealed::SealedBox;

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{FormatError, TransformError};

/// A value flowing through a pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Sealed(SealedBox),
}

impl Value {
    /// Short name of the variant, safe to put in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Sealed(_) => "sealed box",
        }
    }

    /// Rough size of the value (bytes, chars or element count).
    pub fn size(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => 1,
            Value::Text(s) => s.len(),
            Value::Bytes(b) => b.len(),
            Value::List(items) => items.len(),
            Value::Map(entries) => entries.len(),
            Value::Sealed(sealed) => sealed.ciphertext.len(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Take text out of the value or report a type error.
    pub fn into_text(self) -> Result<String, TransformError> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(TransformError::Type {
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    /// Take bytes out of the value or report a type error.
    pub fn into_bytes(self) -> Result<Vec<u8>, TransformError> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(TransformError::Type {
                expected: "bytes",
                found: other.kind(),
            }),
        }
    }

    /// Text or bytes, as bytes. Text is taken as its UTF-8 encoding.
    pub fn into_byte_like(self) -> Result<Vec<u8>, TransformError> {
        match self {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(TransformError::Type {
                expected: "text or bytes",
                found: other.kind(),
            }),
        }
    }

    /// Convert a parsed JSON document into a value.
    ///
    /// Integers that do not fit an `i64` become floats.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert the value into a JSON document.
    ///
    /// Raw bytes have no JSON form and are rejected; sealed boxes become an
    /// object of base64 fields.
    pub fn to_json(&self) -> Result<serde_json::Value, TransformError> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    FormatError::new("json", "non-finite floats have no JSON representation")
                })?,
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(_) => {
                return Err(TransformError::Type {
                    expected: "JSON-serializable value",
                    found: "bytes",
                })
            }
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Map(entries) => {
                let mut object = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    object.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(object)
            }
            Value::Sealed(sealed) => return sealed.to_value().to_json(),
        })
    }
}

impl fmt::Display for Value {
    /// Human-readable rendering for command line output.
    ///
    /// Bytes are shown as lowercase hex. Never used in error messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{}", hex::encode(b)),
            Value::List(_) | Value::Map(_) | Value::Sealed(_) => match self.to_json() {
                Ok(json) => write!(f, "{}", json),
                Err(_) => write!(f, "<{} of {} entries>", self.kind(), self.size()),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

impl From<SealedBox> for Value {
    fn from(sealed: SealedBox) -> Self {
        Value::Sealed(sealed)
    }
}
