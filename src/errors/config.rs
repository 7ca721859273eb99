// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for malformed pipeline specifiers and cookbook files.

use std::fmt;
use thiserror::Error;

use super::NotFoundError;

/// Where in a pipeline definition a bad specifier sits, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecifierPosition(pub Option<usize>);

impl fmt::Display for SpecifierPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, "specifier #{}", position),
            None => write!(f, "specifier"),
        }
    }
}

/// Configuration problems, raised before anything is executed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An override tuple must be `[name]`, `[name, positional]` or
    /// `[name, positional, named]`.
    #[error("{position}: override tuple must have 1 to 3 elements, got {arity}")]
    UnsupportedArity {
        position: SpecifierPosition,
        arity: usize,
    },

    /// The specifier has a shape the pipeline builder does not understand.
    #[error("{position}: {reason}")]
    InvalidSpecifier {
        position: SpecifierPosition,
        reason: String,
    },

    /// A step entry in a cookbook file is malformed.
    #[error("step '{step}': {reason}")]
    InvalidStep { step: String, reason: String },

    /// A value in a cookbook file cannot be represented.
    #[error("invalid value in cookbook: {0}")]
    InvalidValue(String),

    /// A cookbook entry refers to a template that does not exist.
    #[error("'{entry}' refers to an unknown template: {source}")]
    UnknownReference {
        entry: String,
        #[source]
        source: NotFoundError,
    },

    /// A pipeline entry in a cookbook file could not be built.
    #[error("pipeline '{pipeline}': {source}")]
    Pipeline {
        pipeline: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("failed to read cookbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML cookbook: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML cookbook: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported cookbook format: '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub fn invalid_specifier(reason: impl Into<String>) -> Self {
        ConfigError::InvalidSpecifier {
            position: SpecifierPosition::default(),
            reason: reason.into(),
        }
    }

    /// Attach the index of the offending specifier.
    pub fn at(self, index: usize) -> Self {
        match self {
            ConfigError::UnsupportedArity { arity, .. } => ConfigError::UnsupportedArity {
                position: SpecifierPosition(Some(index)),
                arity,
            },
            ConfigError::InvalidSpecifier { reason, .. } => ConfigError::InvalidSpecifier {
                position: SpecifierPosition(Some(index)),
                reason,
            },
            other => other,
        }
    }
}
