// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message digests.

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::errors::TransformError;
use crate::value::{Arguments, Value};

/// Hash bytes with `algorithm` (0): `sha256` (default), `sha384` or `sha512`.
pub fn hash(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let algorithm = args.text_or(0, "algorithm", "sha256")?;
    let bytes = value.into_bytes()?;

    let digest = match algorithm.to_ascii_lowercase().replace('-', "").as_str() {
        "sha256" => Sha256::digest(&bytes).to_vec(),
        "sha384" => Sha384::digest(&bytes).to_vec(),
        "sha512" => Sha512::digest(&bytes).to_vec(),
        _ => {
            return Err(TransformError::InvalidArgument {
                name: "algorithm".to_string(),
                reason: "expected one of sha256, sha384, sha512".to_string(),
            })
        }
    };
    Ok(Value::Bytes(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_digest(input: &[u8], algorithm: &str) -> String {
        let args = Arguments::new(vec![Value::from(algorithm)], Default::default());
        match hash(Value::Bytes(input.to_vec()), &args).unwrap() {
            Value::Bytes(digest) => hex::encode(digest),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            hex_digest(b"hello", "sha256"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(
            hex_digest(b"", "sha256"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex_digest(b"abc", "SHA-512"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
        assert_eq!(hex_digest(b"abc", "sha384").len(), 96);
    }

    #[test]
    fn test_hash_requires_bytes_and_known_algorithm() {
        assert!(matches!(
            hash(Value::from("hello"), &Arguments::empty()),
            Err(TransformError::Type { .. })
        ));
        let md5 = Arguments::new(vec![Value::from("md5")], Default::default());
        assert!(matches!(
            hash(Value::Bytes(vec![]), &md5),
            Err(TransformError::InvalidArgument { .. })
        ));
    }
}
