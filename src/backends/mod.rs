// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transform backends for the cookbook.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process Rust transforms, registered as steps by name:
//! - **Coercion**: text, bytes and scalars in utf8, ascii or latin1
//! - **Codecs**: hex, base64, URL percent-encoding, JSON, octets
//! - **Cryptography**: SHA-2 digests, PBKDF2 key derivation, AES-GCM sealing
//!   and secret-based envelopes
//!
//! ## Stub Backend (Test-Only)
//! Transforms with predictable output and failures for engine tests. Not
//! available in production builds.
//!
//! # Examples
//!
//! ```rust
//! use the_cookbook::backends::local::LocalTransformFactory;
//! use the_cookbook::value::Value;
//!
//! let to_b64 = LocalTransformFactory::create_step("bytes_to_b64").unwrap();
//! assert_eq!(
//!     to_b64.apply(Value::Bytes(b"data".to_vec())).unwrap(),
//!     Value::from("ZGF0YQ==")
//! );
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
