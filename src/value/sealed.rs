// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::Value;
use crate::errors::{FormatError, TransformError};

const CODEC: &str = "sealed box";

/// Output of authenticated encryption.
///
/// Serializes (through [`SealedBox::to_value`]) to a map of base64 text fields
/// `nonce`, `aad`, `ciphertext` and `tag`, so a box survives a JSON round trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SealedBox {
    pub nonce: Vec<u8>,
    pub associated_data: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

impl SealedBox {
    pub fn to_value(&self) -> Value {
        let field = |bytes: &[u8]| Value::Text(STANDARD.encode(bytes));
        let mut entries = BTreeMap::new();
        entries.insert("nonce".to_string(), field(&self.nonce));
        entries.insert("aad".to_string(), field(&self.associated_data));
        entries.insert("ciphertext".to_string(), field(&self.ciphertext));
        entries.insert("tag".to_string(), field(&self.tag));
        Value::Map(entries)
    }

    /// Accept either a sealed box or its map form.
    pub fn from_value(value: Value) -> Result<Self, TransformError> {
        match value {
            Value::Sealed(sealed) => Ok(sealed),
            Value::Map(entries) => Ok(Self {
                nonce: field(&entries, "nonce")?,
                associated_data: match entries.get("aad") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(_) => field(&entries, "aad")?,
                },
                ciphertext: field(&entries, "ciphertext")?,
                tag: field(&entries, "tag")?,
            }),
            other => Err(TransformError::Type {
                expected: "sealed box",
                found: other.kind(),
            }),
        }
    }
}

fn field(entries: &BTreeMap<String, Value>, name: &str) -> Result<Vec<u8>, TransformError> {
    match entries.get(name) {
        Some(Value::Bytes(b)) => Ok(b.clone()),
        Some(Value::Text(s)) => STANDARD
            .decode(s)
            .map_err(|_| FormatError::new(CODEC, format!("field '{}' is not valid base64", name)).into()),
        Some(other) => Err(FormatError::new(
            CODEC,
            format!("field '{}' must be text or bytes, found {}", name, other.kind()),
        )
        .into()),
        None => Err(FormatError::new(CODEC, format!("missing field '{}'", name)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SealedBox {
        SealedBox {
            nonce: vec![1; 12],
            associated_data: b"header".to_vec(),
            ciphertext: vec![7, 8, 9],
            tag: vec![2; 16],
        }
    }

    #[test]
    fn test_map_form_round_trips() {
        let sealed = sample();
        assert_eq!(SealedBox::from_value(sealed.to_value()).unwrap(), sealed);
    }

    #[test]
    fn test_missing_field_is_format_error() {
        let mut entries = match sample().to_value() {
            Value::Map(entries) => entries,
            _ => unreachable!(),
        };
        entries.remove("tag");

        let err = SealedBox::from_value(Value::Map(entries)).unwrap_err();
        match err {
            TransformError::Format(e) => assert!(e.reason.contains("tag")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_aad_is_optional_in_map_form() {
        let mut entries = match sample().to_value() {
            Value::Map(entries) => entries,
            _ => unreachable!(),
        };
        entries.remove("aad");

        let sealed = SealedBox::from_value(Value::Map(entries)).unwrap();
        assert!(sealed.associated_data.is_empty());
    }

    #[test]
    fn test_wrong_kind_is_type_error() {
        assert!(matches!(
            SealedBox::from_value(Value::Int(3)),
            Err(TransformError::Type { .. })
        ));
    }
}
