// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The built-in transform catalog.
//!
//! Every transform is a plain function
//! `fn(Value, &Arguments) -> Result<Value, TransformError>`, registered as a
//! step by [`LocalTransformFactory`](super::LocalTransformFactory). Arguments
//! are read by position or by name, which is why each function documents both.

pub mod aead;
pub mod cast;
pub mod codec;
pub mod digest;
pub mod kdf;
pub mod octets;
pub mod secret;
