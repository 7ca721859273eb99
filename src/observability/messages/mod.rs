// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its level with structured fields.
//!
//! # Organization
//!
//! * `pipeline` - Pipeline run lifecycle and stage events
//! * `registry` - Template registration events
//! * `config` - Cookbook loading events

use tracing::Span;

pub mod config;
pub mod pipeline;
pub mod registry;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message fields.
    fn span(&self, name: &str) -> Span;
}
