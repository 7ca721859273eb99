// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Secret-based envelopes: a key derived from a shared secret seals the
//! payload with AES-256-GCM.
//!
//! An envelope is a map of two text fields:
//! * `ep` - the parameters `rounds$salt$iv$tag`, binary parts in base64
//! * `data` - the base64 ciphertext
//!
//! Every envelope uses a fresh salt, round count and IV, so sealing the
//! same payload twice never produces the same envelope.

use std::collections::BTreeMap;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{Rng, RngCore};
use sha2::Sha512;

use crate::config::consts::{
    DEFAULT_KEY_LENGTH, GCM_NONCE_LENGTH, GCM_TAG_LENGTH, SECRET_MAX_ROUNDS, SECRET_MIN_ROUNDS,
    SECRET_PARAM_SEPARATOR, SECRET_ROUND_SPREAD, SECRET_SALT_LENGTH,
};
use crate::errors::{FormatError, TransformError};
use crate::value::{Arguments, Value};

const CODEC: &str = "secret envelope";

fn cipher_for(secret: &[u8], salt: &[u8], rounds: u32) -> Result<Aes256Gcm, TransformError> {
    let mut key = [0u8; DEFAULT_KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha512>(secret, salt, rounds, &mut key);
    Aes256Gcm::new_from_slice(&key)
        .map_err(|_| TransformError::Crypto("AES-GCM key setup failed".to_string()))
}

/// Seal a payload under `secret` (0, required).
///
/// Text and bytes are sealed as-is; any other value is serialized to JSON
/// first.
pub fn secret_encrypt(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let secret = args.required_bytes(0, "secret")?;
    let payload = match value {
        Value::Text(text) => text.into_bytes(),
        Value::Bytes(bytes) => bytes,
        other => serde_json::to_vec(&other.to_json()?)
            .map_err(|_| FormatError::new("json", "payload cannot be serialized"))?,
    };

    let mut rng = rand::thread_rng();
    let rounds = SECRET_MIN_ROUNDS + rng.gen_range(0..SECRET_ROUND_SPREAD);
    let mut salt = [0u8; SECRET_SALT_LENGTH];
    rng.fill_bytes(&mut salt);
    let mut iv = [0u8; GCM_NONCE_LENGTH];
    rng.fill_bytes(&mut iv);

    let mut data = cipher_for(secret, &salt, rounds)?
        .encrypt(Nonce::from_slice(&iv), payload.as_slice())
        .map_err(|_| TransformError::Crypto("AES-GCM encryption failed".to_string()))?;
    let tag = data.split_off(data.len() - GCM_TAG_LENGTH);

    let sep = SECRET_PARAM_SEPARATOR;
    let ep = format!(
        "{rounds}{sep}{}{sep}{}{sep}{}",
        STANDARD.encode(salt),
        STANDARD.encode(iv),
        STANDARD.encode(tag)
    );

    let mut envelope = BTreeMap::new();
    envelope.insert("ep".to_string(), Value::Text(ep));
    envelope.insert("data".to_string(), Value::Text(STANDARD.encode(data)));
    Ok(Value::Map(envelope))
}

/// Open an envelope with `secret` (0, required).
///
/// A plaintext that parses as JSON is returned as the parsed value, anything
/// else as bytes. A wrong secret or any tampering is
/// [`TransformError::Authentication`].
pub fn secret_decrypt(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let secret = args.required_bytes(0, "secret")?;
    let envelope = match value {
        Value::Map(envelope) => envelope,
        other => {
            return Err(TransformError::Type {
                expected: "secret envelope",
                found: other.kind(),
            })
        }
    };

    let ep = text_field(&envelope, "ep")?;
    let parts: Vec<&str> = ep.split(SECRET_PARAM_SEPARATOR).collect();
    let [rounds, salt, iv, tag] = parts.as_slice() else {
        return Err(FormatError::new(
            CODEC,
            format!("expected 4 parameters, found {}", parts.len()),
        )
        .into());
    };

    // rounds come from untrusted input and are checked before any derivation
    let rounds: u32 = rounds
        .parse()
        .map_err(|_| FormatError::new(CODEC, "round count is not an integer"))?;
    if !(SECRET_MIN_ROUNDS..=SECRET_MAX_ROUNDS).contains(&rounds) {
        return Err(FormatError::new(
            CODEC,
            format!(
                "round count outside {}..={}",
                SECRET_MIN_ROUNDS, SECRET_MAX_ROUNDS
            ),
        )
        .into());
    }
    let salt = decode_part(salt, "salt")?;
    let iv = decode_part(iv, "iv")?;
    let tag = decode_part(tag, "tag")?;
    if iv.len() != GCM_NONCE_LENGTH {
        return Err(FormatError::new(
            CODEC,
            format!("iv must be {} bytes, found {}", GCM_NONCE_LENGTH, iv.len()),
        )
        .into());
    }
    if tag.len() != GCM_TAG_LENGTH {
        return Err(FormatError::new(
            CODEC,
            format!("tag must be {} bytes, found {}", GCM_TAG_LENGTH, tag.len()),
        )
        .into());
    }

    let mut combined = decode_part(text_field(&envelope, "data")?, "data")?;
    combined.extend_from_slice(&tag);

    let plaintext = cipher_for(secret, &salt, rounds)?
        .decrypt(Nonce::from_slice(&iv), combined.as_slice())
        .map_err(|_| TransformError::Authentication)?;

    Ok(std::str::from_utf8(&plaintext)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
        .map(Value::from_json)
        .unwrap_or(Value::Bytes(plaintext)))
}

fn text_field<'a>(envelope: &'a BTreeMap<String, Value>, name: &str) -> Result<&'a str, TransformError> {
    envelope
        .get(name)
        .and_then(Value::as_text)
        .ok_or_else(|| FormatError::new(CODEC, format!("missing text field '{}'", name)).into())
}

fn decode_part(part: &str, name: &str) -> Result<Vec<u8>, TransformError> {
    STANDARD
        .decode(part)
        .map_err(|_| FormatError::new(CODEC, format!("'{}' is not valid base64", name)).into())
}
