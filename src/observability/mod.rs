// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the cookbook. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep log fields consistent between the engine, the registries and the loader
//! * Guarantee that no transformed value or argument ever reaches a log line
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::pipeline` - Pipeline run lifecycle and stage events
//! * `messages::registry` - Template registration events
//! * `messages::config` - Cookbook loading events
//!
//! # Usage
//!
//! ```rust
//! use the_cookbook::observability::messages::pipeline::StageFailed;
//! use the_cookbook::observability::messages::StructuredLog;
//!
//! let msg = StageFailed {
//!     pipeline: "sha256_hex",
//!     step: Some("hex_to_bytes"),
//!     position: 2,
//!     error_kind: "format",
//! };
//!
//! msg.log();
//! ```

pub mod messages;
