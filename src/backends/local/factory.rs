// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Registry;
use crate::engine::{Pipeline, Stage, Step};

use super::transforms::{aead, cast, codec, digest, kdf, octets, secret};

/// Every built-in implementation name, in registration order.
const IMPLEMENTATIONS: &[&str] = &[
    "cast_to_str",
    "cast_to_bytes",
    "str_to_bytes",
    "bytes_to_str",
    "numbers_to_str",
    "hex_to_bytes",
    "bytes_to_hex",
    "bytes_to_b64",
    "b64_to_bytes",
    "urlencode",
    "urldecode",
    "json_to_str",
    "str_to_json",
    "int_to_octet",
    "octet_to_int",
    "bytes_to_ints",
    "ints_to_bytes",
    "hash",
    "sha256",
    "sha384",
    "sha512",
    "derive_key",
    "derive_key_record",
    "aead_encrypt",
    "aead_decrypt",
    "secret_encrypt",
    "secret_decrypt",
];

/// Names of the built-in pipeline templates.
const RECIPES: &[&str] = &["urlencoded", "to_urlencoded_b64_string", "sha256_hex"];

/// Factory for the in-process transform catalog.
pub struct LocalTransformFactory;

impl LocalTransformFactory {
    /// Create the step registered under a built-in implementation name.
    ///
    /// Steps come with no arguments bound except the prebound hash variants
    /// (`sha256`, `sha384`, `sha512`), which are `hash` with its algorithm set.
    pub fn create_step(impl_name: &str) -> Option<Step> {
        let step = match impl_name {
            // Coercion
            "cast_to_str" => Step::new(impl_name, cast::cast_to_str),
            "cast_to_bytes" => Step::new(impl_name, cast::cast_to_bytes),
            "str_to_bytes" => Step::new(impl_name, cast::str_to_bytes),
            "bytes_to_str" => Step::new(impl_name, cast::bytes_to_str),
            "numbers_to_str" => Step::new(impl_name, cast::numbers_to_str),

            // Codecs
            "hex_to_bytes" => Step::new(impl_name, codec::hex_to_bytes),
            "bytes_to_hex" => Step::new(impl_name, codec::bytes_to_hex),
            "bytes_to_b64" => Step::new(impl_name, codec::bytes_to_b64),
            "b64_to_bytes" => Step::new(impl_name, codec::b64_to_bytes),
            "urlencode" => Step::new(impl_name, codec::urlencode),
            "urldecode" => Step::new(impl_name, codec::urldecode),
            "json_to_str" => Step::new(impl_name, codec::json_to_str),
            "str_to_json" => Step::new(impl_name, codec::str_to_json),

            // Octets
            "int_to_octet" => Step::new(impl_name, octets::int_to_octet),
            "octet_to_int" => Step::new(impl_name, octets::octet_to_int),
            "bytes_to_ints" => Step::new(impl_name, octets::bytes_to_ints),
            "ints_to_bytes" => Step::new(impl_name, octets::ints_to_bytes),

            // Digests
            "hash" => Step::new(impl_name, digest::hash),
            "sha256" | "sha384" | "sha512" => Step::new(impl_name, digest::hash).with_args(impl_name),

            // Keys and encryption
            "derive_key" => Step::new(impl_name, kdf::derive_key),
            "derive_key_record" => Step::new(impl_name, kdf::derive_key_record),
            "aead_encrypt" => Step::new(impl_name, aead::aead_encrypt),
            "aead_decrypt" => Step::new(impl_name, aead::aead_decrypt),
            "secret_encrypt" => Step::new(impl_name, secret::secret_encrypt),
            "secret_decrypt" => Step::new(impl_name, secret::secret_decrypt),

            _ => return None,
        };
        Some(step)
    }

    /// List all available local transform implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        IMPLEMENTATIONS.to_vec()
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(impl_name: &str) -> bool {
        IMPLEMENTATIONS.contains(&impl_name)
    }

    /// Register every built-in step under its implementation name.
    pub fn register_builtins(steps: &Registry<Step>) {
        for step in IMPLEMENTATIONS.iter().filter_map(|name| Self::create_step(name)) {
            steps.add(step.name().to_string(), step);
        }
    }

    /// Create a built-in pipeline template by name.
    pub fn create_recipe(name: &str) -> Option<Pipeline> {
        let stages = match name {
            // numbers cast to text, then URL-encoded
            "urlencoded" => vec![
                Step::new("numbers_to_str", cast::numbers_to_str),
                Step::new("urlencode", codec::urlencode),
            ],
            "to_urlencoded_b64_string" => vec![
                Step::new("cast_to_bytes", cast::cast_to_bytes),
                Step::new("bytes_to_b64", codec::bytes_to_b64),
                Step::new("urlencode", codec::urlencode),
            ],
            "sha256_hex" => vec![
                Step::new("str_to_bytes", cast::str_to_bytes).with_args("utf8"),
                Step::new("sha256", digest::hash).with_args("sha256"),
                Step::new("bytes_to_hex", codec::bytes_to_hex),
            ],
            _ => return None,
        };

        Some(
            stages
                .into_iter()
                .fold(Pipeline::new().named(name), |pipeline, step| {
                    pipeline.then(Stage::Step(step))
                }),
        )
    }

    pub fn list_available_recipes() -> Vec<&'static str> {
        RECIPES.to_vec()
    }

    /// Register every built-in pipeline template under its name.
    pub fn register_recipes(pipelines: &Registry<Pipeline>) {
        for name in RECIPES {
            if let Some(recipe) = Self::create_recipe(name) {
                pipelines.add(*name, recipe);
            }
        }
    }
}
