// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while values move through steps.
//!
//! None of these carry the value being transformed, its arguments, or any
//! derived material. Reasons report kinds, offsets and lengths only.

use std::fmt;
use thiserror::Error;

/// Malformed input handed to a decoder.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed {codec} input: {reason}")]
pub struct FormatError {
    pub codec: &'static str,
    pub reason: String,
}

impl FormatError {
    pub fn new(codec: &'static str, reason: impl Into<String>) -> Self {
        Self {
            codec,
            reason: reason.into(),
        }
    }
}

/// Failure reported by a single transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input value has a kind the transform does not accept.
    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    /// The input is well-formed but out of the accepted domain.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    /// Authenticated decryption rejected the ciphertext or tag.
    #[error("authentication failed: ciphertext or tag does not verify")]
    Authentication,

    /// A nested pipeline used as a stage failed.
    #[error("nested pipeline failed: {0}")]
    Pipeline(Box<TransformationError>),

    #[error("{0}")]
    Other(String),
}

impl TransformError {
    /// Stable short name of the error kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::Type { .. } => "type",
            TransformError::Format(_) => "format",
            TransformError::InvalidArgument { .. } => "invalid_argument",
            TransformError::MissingArgument(_) => "missing_argument",
            TransformError::InvalidValue(_) => "invalid_value",
            TransformError::Crypto(_) => "crypto",
            TransformError::Authentication => "authentication",
            TransformError::Pipeline(_) => "pipeline",
            TransformError::Other(_) => "other",
        }
    }
}

/// A step failed while a pipeline (or the step alone) was running.
#[derive(Debug, Error)]
pub struct TransformationError {
    /// Name of the failing step; `None` for bare transforms.
    pub step: Option<String>,
    /// Index of the stage in its pipeline; `None` when applied standalone.
    pub position: Option<usize>,
    #[source]
    pub source: TransformError,
}

impl TransformationError {
    pub fn new(step: Option<String>, position: Option<usize>, source: TransformError) -> Self {
        Self {
            step,
            position,
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }
}

impl fmt::Display for TransformationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.step {
            Some(step) => write!(f, "step '{}'", step)?,
            None => write!(f, "bare transform")?,
        }
        if let Some(position) = self.position {
            write!(f, " at position {}", position)?;
        }
        write!(f, " failed: {}", self.source)
    }
}
