// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Password-based key derivation (PBKDF2-HMAC-SHA512).
//!
//! Arguments: `length` (0) in bytes, `iterations` (1) and `salt` (2). The salt
//! is random for every call unless bound, so [`derive_key`] alone is only
//! repeatable with a fixed salt; [`derive_key_record`] returns the salt it
//! used.

use std::collections::BTreeMap;

use rand::RngCore;
use sha2::Sha512;

use crate::config::consts::{
    DEFAULT_KEY_LENGTH, DEFAULT_PBKDF2_ROUNDS, DEFAULT_SALT_LENGTH, MAX_KEY_LENGTH,
};
use crate::errors::TransformError;
use crate::value::{Arguments, Value};

struct Derivation {
    key: Vec<u8>,
    salt: Vec<u8>,
    iterations: u32,
}

fn derive(value: Value, args: &Arguments) -> Result<Derivation, TransformError> {
    let password = value.into_byte_like()?;
    let length = args.usize(0, "length")?.unwrap_or(DEFAULT_KEY_LENGTH);
    let iterations = args.u32(1, "iterations")?.unwrap_or(DEFAULT_PBKDF2_ROUNDS);

    if length == 0 || length > MAX_KEY_LENGTH {
        return Err(TransformError::InvalidArgument {
            name: "length".to_string(),
            reason: format!("expected 1 to {} bytes", MAX_KEY_LENGTH),
        });
    }
    if iterations == 0 {
        return Err(TransformError::InvalidArgument {
            name: "iterations".to_string(),
            reason: "expected at least one iteration".to_string(),
        });
    }

    let salt = match args.bytes(2, "salt")? {
        Some(salt) => salt.to_vec(),
        None => {
            let mut salt = vec![0u8; DEFAULT_SALT_LENGTH];
            rand::thread_rng().fill_bytes(&mut salt);
            salt
        }
    };

    let mut key = vec![0u8; length];
    pbkdf2::pbkdf2_hmac::<Sha512>(&password, &salt, iterations, &mut key);
    Ok(Derivation {
        key,
        salt,
        iterations,
    })
}

/// The derived key as bytes.
pub fn derive_key(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    Ok(Value::Bytes(derive(value, args)?.key))
}

/// A map of `key`, `salt` and `iterations`.
pub fn derive_key_record(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let derivation = derive(value, args)?;
    let mut record = BTreeMap::new();
    record.insert("key".to_string(), Value::Bytes(derivation.key));
    record.insert("salt".to_string(), Value::Bytes(derivation.salt));
    record.insert(
        "iterations".to_string(),
        Value::Int(i64::from(derivation.iterations)),
    );
    Ok(Value::Map(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::NamedArgs;

    fn args(length: i64, iterations: i64, salt: Option<&[u8]>) -> Arguments {
        let mut named = NamedArgs::new();
        if let Some(salt) = salt {
            named.insert("salt".into(), Value::Bytes(salt.to_vec()));
        }
        Arguments::new(vec![Value::Int(length), Value::Int(iterations)], named)
    }

    #[test]
    fn test_known_vector() {
        // PBKDF2-HMAC-SHA512, password "password", salt "salt", one iteration
        let key = derive_key(Value::from("password"), &args(64, 1, Some(b"salt"))).unwrap();
        assert_eq!(
            key,
            Value::Bytes(
                hex::decode(
                    "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252\
                     c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce"
                )
                .unwrap()
            )
        );
    }

    #[test]
    fn test_fixed_salt_is_deterministic_and_random_salt_is_not() {
        let fixed = args(32, 10, Some(b"pepper"));
        assert_eq!(
            derive_key(Value::from("pw"), &fixed).unwrap(),
            derive_key(Value::from("pw"), &fixed).unwrap()
        );

        let random = args(32, 10, None);
        assert_ne!(
            derive_key(Value::from("pw"), &random).unwrap(),
            derive_key(Value::from("pw"), &random).unwrap()
        );
    }

    #[test]
    fn test_record_reproduces_key() {
        let record = match derive_key_record(Value::from("pw"), &args(16, 5, None)).unwrap() {
            Value::Map(record) => record,
            other => panic!("unexpected value {:?}", other),
        };
        assert_eq!(record["iterations"], Value::Int(5));

        let salt = record["salt"].as_bytes().unwrap();
        assert_eq!(salt.len(), DEFAULT_SALT_LENGTH);
        let again = derive_key(Value::from("pw"), &args(16, 5, Some(salt))).unwrap();
        assert_eq!(again, record["key"]);
    }

    #[test]
    fn test_rejected_parameters() {
        for (length, iterations) in [(0, 1), (MAX_KEY_LENGTH as i64 + 1, 1), (32, 0), (-1, 1)] {
            assert!(
                matches!(
                    derive_key(Value::from("pw"), &args(length, iterations, Some(b"s"))),
                    Err(TransformError::InvalidArgument { .. })
                ),
                "length={} iterations={}",
                length,
                iterations
            );
        }
    }
}
