// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Coercion between text, bytes and scalars.
//!
//! Arguments: `encoding` (position 0), one of `utf8`, `ascii` or `latin1`.

use crate::config::consts::DEFAULT_ENCODING;
use crate::errors::{FormatError, TransformError};
use crate::value::{Arguments, Value};

/// Text encodings understood by the coercion transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    pub fn from_name(name: &str) -> Result<Self, TransformError> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            _ => Err(TransformError::InvalidArgument {
                name: "encoding".to_string(),
                reason: "expected one of utf8, ascii, latin1".to_string(),
            }),
        }
    }

    fn from_args(args: &Arguments) -> Result<Self, TransformError> {
        Self::from_name(args.text_or(0, "encoding", DEFAULT_ENCODING)?)
    }

    fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>, TransformError> {
        let limit = match self {
            Encoding::Utf8 => return Ok(text.as_bytes().to_vec()),
            Encoding::Ascii => 0x7f,
            Encoding::Latin1 => 0xff,
        };

        text.chars()
            .enumerate()
            .map(|(offset, c)| {
                u8::try_from(u32::from(c))
                    .ok()
                    .filter(|b| u32::from(*b) <= limit)
                    .ok_or_else(|| {
                        TransformError::InvalidValue(format!(
                            "character at offset {} is not representable in {}",
                            offset,
                            self.label()
                        ))
                    })
            })
            .collect()
    }

    pub fn decode(self, bytes: Vec<u8>) -> Result<String, TransformError> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
                FormatError::new(
                    "utf-8",
                    format!(
                        "invalid sequence at byte offset {}",
                        e.utf8_error().valid_up_to()
                    ),
                )
                .into()
            }),
            Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(FormatError::new(
                    "ascii",
                    format!("non-ascii byte at offset {}", offset),
                )
                .into()),
                None => Ok(bytes.into_iter().map(char::from).collect()),
            },
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

/// Any scalar rendered as text: text unchanged, numbers and booleans in
/// their canonical form, bytes decoded.
pub fn cast_to_str(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let encoding = Encoding::from_args(args)?;
    Ok(Value::Text(scalar_text(value, encoding)?))
}

/// Any scalar as bytes: bytes unchanged, everything else rendered as text
/// and encoded.
pub fn cast_to_bytes(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let encoding = Encoding::from_args(args)?;
    match value {
        Value::Bytes(bytes) => Ok(Value::Bytes(bytes)),
        other => Ok(Value::Bytes(encoding.encode(&scalar_text(other, encoding)?)?)),
    }
}

pub fn str_to_bytes(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let encoding = Encoding::from_args(args)?;
    Ok(Value::Bytes(encoding.encode(&value.into_text()?)?))
}

pub fn bytes_to_str(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let encoding = Encoding::from_args(args)?;
    Ok(Value::Text(encoding.decode(value.into_bytes()?)?))
}

/// Numbers rendered as text, everything else passed through.
pub fn numbers_to_str(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    Ok(match value {
        Value::Int(i) => Value::Text(i.to_string()),
        Value::Float(f) => Value::Text(float_text(f)),
        other => other,
    })
}

fn scalar_text(value: Value, encoding: Encoding) -> Result<String, TransformError> {
    match value {
        Value::Text(text) => Ok(text),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(float_text(f)),
        Value::Bool(b) => Ok(if b { "true" } else { "false" }.to_string()),
        Value::Bytes(bytes) => encoding.decode(bytes),
        other => Err(TransformError::Type {
            expected: "text, bytes, number or bool",
            found: other.kind(),
        }),
    }
}

// Whole floats keep their fractional marker, so 2.0 stays "2.0".
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
