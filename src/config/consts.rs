// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Text encoding used when a coercion step is given none
pub const DEFAULT_ENCODING: &str = "utf8";

/// Characters `urlencode` leaves untouched unless told otherwise
pub const DEFAULT_URL_SAFE: &str = "/";

/// PBKDF2 iteration count for `derive_key` when none is bound
pub const DEFAULT_PBKDF2_ROUNDS: u32 = 100_000;
/// Derived key length in bytes (AES-256)
pub const DEFAULT_KEY_LENGTH: usize = 32;
/// Random salt length in bytes for `derive_key`
pub const DEFAULT_SALT_LENGTH: usize = 16;
/// Upper bound on derived key length, to keep a bad argument from allocating wildly
pub const MAX_KEY_LENGTH: usize = 1024;

/// AES-GCM nonce length in bytes
pub const GCM_NONCE_LENGTH: usize = 12;
/// AES-GCM authentication tag length in bytes
pub const GCM_TAG_LENGTH: usize = 16;

/// Salt length in bytes of a secret envelope
pub const SECRET_SALT_LENGTH: usize = 12;
/// Fewest PBKDF2 rounds a secret envelope is sealed with
pub const SECRET_MIN_ROUNDS: u32 = 100;
/// Spread of the random round count on top of the minimum
pub const SECRET_ROUND_SPREAD: u32 = 1_000;
/// Most PBKDF2 rounds `secret_decrypt` accepts from an envelope
pub const SECRET_MAX_ROUNDS: u32 = SECRET_MIN_ROUNDS + SECRET_ROUND_SPREAD - 1;
/// Field separator of the envelope parameter string `rounds$salt$iv$tag`
pub const SECRET_PARAM_SEPARATOR: char = '$';
