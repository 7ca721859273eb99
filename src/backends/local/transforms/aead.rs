// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Authenticated encryption with AES-GCM (128- or 256-bit keys).

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;

use crate::config::consts::{GCM_NONCE_LENGTH, GCM_TAG_LENGTH};
use crate::errors::{FormatError, TransformError};
use crate::value::{Arguments, SealedBox, Value};

enum Cipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    fn new(key: &[u8]) -> Result<Self, TransformError> {
        let init = |_| TransformError::Crypto("AES-GCM key setup failed".to_string());
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Cipher::Aes128).map_err(init),
            32 => Aes256Gcm::new_from_slice(key).map(Cipher::Aes256).map_err(init),
            n => Err(TransformError::InvalidArgument {
                name: "key".to_string(),
                reason: format!("expected a 16 or 32 byte key, found {} bytes", n),
            }),
        }
    }

    fn seal(&self, nonce: &[u8], payload: Payload) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            Cipher::Aes128(cipher) => cipher.encrypt(nonce, payload),
            Cipher::Aes256(cipher) => cipher.encrypt(nonce, payload),
        }
    }

    fn open(&self, nonce: &[u8], payload: Payload) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            Cipher::Aes128(cipher) => cipher.decrypt(nonce, payload),
            Cipher::Aes256(cipher) => cipher.decrypt(nonce, payload),
        }
    }
}

/// Encrypt bytes (or text) into a [`SealedBox`].
///
/// Arguments: `key` (0, required), `aad` (1) authenticated but not
/// encrypted, and `nonce` (2), random unless bound. A nonce must never be
/// reused with the same key.
pub fn aead_encrypt(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let plaintext = value.into_byte_like()?;
    let cipher = Cipher::new(args.required_bytes(0, "key")?)?;
    let associated_data = args.bytes(1, "aad")?.unwrap_or_default().to_vec();

    let nonce = match args.bytes(2, "nonce")? {
        Some(nonce) if nonce.len() == GCM_NONCE_LENGTH => nonce.to_vec(),
        Some(nonce) => {
            return Err(TransformError::InvalidArgument {
                name: "nonce".to_string(),
                reason: format!(
                    "expected {} bytes, found {}",
                    GCM_NONCE_LENGTH,
                    nonce.len()
                ),
            })
        }
        None => {
            let mut nonce = vec![0u8; GCM_NONCE_LENGTH];
            rand::thread_rng().fill_bytes(&mut nonce);
            nonce
        }
    };

    let mut ciphertext = cipher
        .seal(
            &nonce,
            Payload {
                msg: &plaintext,
                aad: &associated_data,
            },
        )
        .map_err(|_| TransformError::Crypto("AES-GCM encryption failed".to_string()))?;
    let tag = ciphertext.split_off(ciphertext.len() - GCM_TAG_LENGTH);

    Ok(Value::Sealed(SealedBox {
        nonce,
        associated_data,
        ciphertext,
        tag,
    }))
}

/// Open a [`SealedBox`] (or its map form) with `key` (0, required).
///
/// Returns the plaintext bytes only when the tag verifies. Any tampering
/// with the nonce, associated data, ciphertext or tag, as well as a wrong
/// key, is reported as [`TransformError::Authentication`].
pub fn aead_decrypt(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let sealed = SealedBox::from_value(value)?;
    let cipher = Cipher::new(args.required_bytes(0, "key")?)?;

    if sealed.nonce.len() != GCM_NONCE_LENGTH {
        return Err(FormatError::new(
            "sealed box",
            format!(
                "nonce must be {} bytes, found {}",
                GCM_NONCE_LENGTH,
                sealed.nonce.len()
            ),
        )
        .into());
    }
    if sealed.tag.len() != GCM_TAG_LENGTH {
        return Err(FormatError::new(
            "sealed box",
            format!("tag must be {} bytes, found {}", GCM_TAG_LENGTH, sealed.tag.len()),
        )
        .into());
    }

    let mut combined = sealed.ciphertext;
    combined.extend_from_slice(&sealed.tag);
    cipher
        .open(
            &sealed.nonce,
            Payload {
                msg: &combined,
                aad: &sealed.associated_data,
            },
        )
        .map(Value::Bytes)
        .map_err(|_| TransformError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::NamedArgs;

    const KEY: [u8; 32] = [7u8; 32];

    fn key_args(key: &[u8]) -> Arguments {
        let mut named = NamedArgs::new();
        named.insert("key".into(), Value::Bytes(key.to_vec()));
        Arguments::new(vec![], named)
    }

    fn seal(plaintext: &[u8]) -> SealedBox {
        let mut args = key_args(&KEY);
        args.set_named("aad", Value::Bytes(b"header".to_vec()));
        match aead_encrypt(Value::Bytes(plaintext.to_vec()), &args).unwrap() {
            Value::Sealed(sealed) => sealed,
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_for_both_key_sizes() {
        for key in [&[1u8; 16][..], &[2u8; 32][..]] {
            let sealed = aead_encrypt(Value::from("attack at dawn"), &key_args(key)).unwrap();
            assert_eq!(
                aead_decrypt(sealed, &key_args(key)).unwrap(),
                Value::Bytes(b"attack at dawn".to_vec())
            );
        }
    }

    #[test]
    fn test_box_layout() {
        let sealed = seal(b"plaintext");
        assert_eq!(sealed.nonce.len(), GCM_NONCE_LENGTH);
        assert_eq!(sealed.tag.len(), GCM_TAG_LENGTH);
        assert_eq!(sealed.ciphertext.len(), b"plaintext".len());
        assert_eq!(sealed.associated_data, b"header");
        assert_ne!(sealed.ciphertext, b"plaintext");
    }

    #[test]
    fn test_fixed_nonce_is_deterministic() {
        let mut args = key_args(&KEY);
        args.set_named("nonce", Value::Bytes(vec![9u8; GCM_NONCE_LENGTH]));
        assert_eq!(
            aead_encrypt(Value::from("x"), &args).unwrap(),
            aead_encrypt(Value::from("x"), &args).unwrap()
        );
    }

    #[test]
    fn test_any_tampering_fails_authentication() {
        struct TestCase {
            name: &'static str,
            tamper: fn(&mut SealedBox),
        }

        let test_cases = vec![
            TestCase {
                name: "flipped ciphertext bit",
                tamper: |sealed| sealed.ciphertext[0] ^= 0x01,
            },
            TestCase {
                name: "flipped tag bit",
                tamper: |sealed| sealed.tag[15] ^= 0x80,
            },
            TestCase {
                name: "flipped nonce bit",
                tamper: |sealed| sealed.nonce[3] ^= 0x10,
            },
            TestCase {
                name: "altered associated data",
                tamper: |sealed| sealed.associated_data.push(b'!'),
            },
            TestCase {
                name: "truncated ciphertext",
                tamper: |sealed| {
                    sealed.ciphertext.pop();
                },
            },
        ];

        for test_case in test_cases {
            let mut sealed = seal(b"secret payload");
            (test_case.tamper)(&mut sealed);
            assert!(
                matches!(
                    aead_decrypt(Value::Sealed(sealed), &key_args(&KEY)),
                    Err(TransformError::Authentication)
                ),
                "Test case '{}'",
                test_case.name
            );
        }
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = seal(b"secret payload");
        assert!(matches!(
            aead_decrypt(Value::Sealed(sealed), &key_args(&[8u8; 32])),
            Err(TransformError::Authentication)
        ));
    }

    #[test]
    fn test_map_form_decrypts() {
        let sealed = seal(b"through json");
        let as_map = sealed.to_value();
        assert_eq!(
            aead_decrypt(as_map, &key_args(&KEY)).unwrap(),
            Value::Bytes(b"through json".to_vec())
        );
    }

    #[test]
    fn test_malformed_inputs() {
        let mut short_tag = seal(b"x");
        short_tag.tag.truncate(8);
        assert!(matches!(
            aead_decrypt(Value::Sealed(short_tag), &key_args(&KEY)),
            Err(TransformError::Format(_))
        ));

        assert!(matches!(
            aead_encrypt(Value::from("x"), &key_args(&[0u8; 24])),
            Err(TransformError::InvalidArgument { .. })
        ));
        assert!(matches!(
            aead_encrypt(Value::from("x"), &Arguments::empty()),
            Err(TransformError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_errors_do_not_leak_key_or_plaintext() {
        let mut sealed = seal(b"very secret");
        sealed.tag[0] ^= 1;
        let err = aead_decrypt(Value::Sealed(sealed), &key_args(&KEY)).unwrap_err();
        let rendered = format!("{} {:?}", err, err);
        assert!(!rendered.contains("very secret"));
        assert!(!rendered.contains(&hex::encode(KEY)));
    }
}
