// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reversible codecs: hex, base64, URL percent-encoding and JSON.
//!
//! Each decoder is the exact inverse of its encoder and rejects malformed
//! input with a [`FormatError`]. Reasons carry offsets, never input.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::config::consts::DEFAULT_URL_SAFE;
use crate::errors::{FormatError, TransformError};
use crate::value::{Arguments, Value};

/// Escaped by `urlencode`: everything except letters, digits and `_.-~`.
const URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Hex text to bytes. Whitespace between digits is ignored.
pub fn hex_to_bytes(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let text = value.into_text()?;
    let mut digits = String::with_capacity(text.len());
    // byte offset in `text` of every byte kept in `digits`
    let mut offsets = Vec::with_capacity(text.len());
    for (offset, c) in text.char_indices().filter(|(_, c)| !c.is_whitespace()) {
        digits.push(c);
        offsets.extend(offset..offset + c.len_utf8());
    }
    hex::decode(&digits)
        .map(Value::Bytes)
        .map_err(|e| hex_error(e, &offsets).into())
}

fn hex_error(error: hex::FromHexError, offsets: &[usize]) -> FormatError {
    let reason = match error {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            let offset = offsets.get(index).copied().unwrap_or(index);
            format!("invalid digit at offset {}", offset)
        }
        hex::FromHexError::OddLength => "odd number of digits".to_string(),
        hex::FromHexError::InvalidStringLength => "invalid length".to_string(),
    };
    FormatError::new("hex", reason)
}

/// Bytes to lowercase hex.
///
/// Arguments: `sep` (0) placed between blocks, `bytes_per_block` (1) block
/// size counted from the left (default 1 when a separator is given) and
/// `upper` (2) for uppercase digits.
pub fn bytes_to_hex(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let bytes = value.into_bytes()?;
    let sep = args.text(0, "sep")?;
    let bytes_per_block = args.usize(1, "bytes_per_block")?.unwrap_or(1);
    let upper = args.boolean(2, "upper")?.unwrap_or(false);

    let encode = |chunk: &[u8]| {
        if upper {
            hex::encode_upper(chunk)
        } else {
            hex::encode(chunk)
        }
    };

    let text = match sep {
        Some(sep) if !sep.is_empty() && bytes_per_block > 0 => bytes
            .chunks(bytes_per_block)
            .map(encode)
            .collect::<Vec<_>>()
            .join(sep),
        _ => encode(&bytes),
    };
    Ok(Value::Text(text))
}

pub fn bytes_to_b64(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    Ok(Value::Text(STANDARD.encode(value.into_bytes()?)))
}

pub fn b64_to_bytes(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let text = value.into_text()?;
    STANDARD
        .decode(text.trim_end())
        .map(Value::Bytes)
        .map_err(|e| base64_error(e).into())
}

fn base64_error(error: base64::DecodeError) -> FormatError {
    let reason = match error {
        base64::DecodeError::InvalidByte(offset, _) => {
            format!("invalid symbol at offset {}", offset)
        }
        base64::DecodeError::InvalidLength => "invalid length".to_string(),
        base64::DecodeError::InvalidLastSymbol(offset, _) => {
            format!("invalid trailing symbol at offset {}", offset)
        }
        base64::DecodeError::InvalidPadding => "invalid padding".to_string(),
    };
    FormatError::new("base64", reason)
}

/// Percent-encode text (or bytes).
///
/// Letters, digits and `_.-~` are never escaped. Arguments: `safe` (0), extra
/// ASCII characters to leave as-is, `/` unless bound.
pub fn urlencode(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let bytes = value.into_byte_like()?;
    let safe = args.text_or(0, "safe", DEFAULT_URL_SAFE)?;

    let safe: Vec<u8> = safe.bytes().filter(u8::is_ascii).collect();
    let escaped = percent_encode(&bytes, URL_ENCODE_SET);
    if safe.is_empty() {
        return Ok(Value::Text(escaped.to_string()));
    }

    // escapes come out one `%XX` chunk per byte; safe ones are put back
    let mut encoded = String::with_capacity(bytes.len());
    for chunk in escaped {
        match chunk
            .strip_prefix('%')
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        {
            Some(b) if safe.contains(&b) => encoded.push(char::from(b)),
            _ => encoded.push_str(chunk),
        }
    }
    Ok(Value::Text(encoded))
}

/// Decode `%XX` escapes. A `%` not followed by two hex digits is rejected.
pub fn urldecode(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let text = value.into_text()?;
    let raw = text.as_bytes();

    let mut offset = 0;
    while let Some(found) = raw[offset..].iter().position(|b| *b == b'%') {
        let at = offset + found;
        let escape = raw.get(at + 1..at + 3);
        if !escape.is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit)) {
            return Err(FormatError::new("url", format!("incomplete escape at offset {}", at)).into());
        }
        offset = at + 3;
    }

    percent_decode(raw)
        .decode_utf8()
        .map(|decoded| Value::Text(decoded.into_owned()))
        .map_err(|e| {
            FormatError::new(
                "url",
                format!(
                    "decoded bytes are not UTF-8 (valid up to byte {})",
                    e.valid_up_to()
                ),
            )
            .into()
        })
}

/// Serialize a value as JSON text.
///
/// Arguments: `indent` (0), spaces per level for pretty output; compact
/// when unbound.
pub fn json_to_str(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let json = value.to_json()?;
    let text = match args.usize(0, "indent")? {
        None => serde_json::to_string(&json),
        Some(indent) => {
            let indent = " ".repeat(indent);
            let mut out = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            json.serialize(&mut serializer)
                .map(|_| String::from_utf8_lossy(&out).into_owned())
        }
    }
    .map_err(|e| FormatError::new("json", format!("cannot serialize: {:?}", e.classify())))?;
    Ok(Value::Text(text))
}

pub fn str_to_json(value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    let text = value.into_text()?;
    serde_json::from_str::<serde_json::Value>(&text)
        .map(Value::from_json)
        .map_err(|e| {
            FormatError::new(
                "json",
                format!(
                    "{:?} error at line {} column {}",
                    e.classify(),
                    e.line(),
                    e.column()
                ),
            )
            .into()
        })
}
