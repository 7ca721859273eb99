// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bytes as integers and as eight-character bit strings.

use crate::errors::{FormatError, TransformError};
use crate::value::{Arguments, Value};

/// An integer in `0..=255` as an eight-digit binary string, most
/// significant bit first.
pub fn int_to_octet(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let byte = byte_from(&value)?;
    Ok(Value::Text(format!("{:08b}", byte)))
}

/// An eight-digit binary string, most significant bit first, as an integer.
pub fn octet_to_int(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let text = value.into_text()?;
    if text.len() != 8 {
        return Err(FormatError::new(
            "octet",
            format!("expected 8 binary digits, found {} characters", text.chars().count()),
        )
        .into());
    }
    if let Some(offset) = text.bytes().position(|b| b != b'0' && b != b'1') {
        return Err(FormatError::new("octet", format!("non-binary digit at offset {}", offset)).into());
    }
    u8::from_str_radix(&text, 2)
        .map(|byte| Value::Int(i64::from(byte)))
        .map_err(|_| FormatError::new("octet", "not a binary number").into())
}

pub fn bytes_to_ints(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let bytes = value.into_bytes()?;
    Ok(Value::List(
        bytes.into_iter().map(|b| Value::Int(i64::from(b))).collect(),
    ))
}

pub fn ints_to_bytes(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let items = match value {
        Value::List(items) => items,
        other => {
            return Err(TransformError::Type {
                expected: "list of integers",
                found: other.kind(),
            })
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            byte_from(item).map_err(|e| match e {
                TransformError::InvalidValue(_) => {
                    TransformError::InvalidValue(format!("element {} is out of byte range", index))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<u8>, _>>()
        .map(Value::Bytes)
}

fn byte_from(value: &Value) -> Result<u8, TransformError> {
    match value {
        Value::Int(i) => u8::try_from(*i).map_err(|_| {
            TransformError::InvalidValue("octets represent 0 to 255 only".to_string())
        }),
        other => Err(TransformError::Type {
            expected: "int",
            found: other.kind(),
        }),
    }
}
