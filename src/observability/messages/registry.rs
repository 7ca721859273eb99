// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for template registry events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A template was registered under a new name.
///
/// # Log Level
/// `debug!` - Registration happens in bulk at startup
pub struct TemplateRegistered<'a> {
    pub kind: &'static str,
    pub name: &'a str,
    pub total: usize,
}

impl Display for TemplateRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered {} '{}' ({} templates)",
            self.kind, self.name, self.total
        )
    }
}

impl StructuredLog for TemplateRegistered<'_> {
    fn log(&self) {
        tracing::debug!(kind = self.kind, name = self.name, total = self.total, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("registry", span_name = name, kind = self.kind, name = self.name)
    }
}

/// A template replaced an earlier one with the same name.
///
/// # Log Level
/// `debug!` - Overwriting is allowed; last writer wins
///
/// # Example
/// ```
/// use the_cookbook::observability::messages::registry::TemplateOverwritten;
///
/// let msg = TemplateOverwritten { kind: "step", name: "utf8" };
/// assert_eq!(msg.to_string(), "Overwrote step 'utf8'");
/// ```
pub struct TemplateOverwritten<'a> {
    pub kind: &'static str,
    pub name: &'a str,
}

impl Display for TemplateOverwritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Overwrote {} '{}'", self.kind, self.name)
    }
}

impl StructuredLog for TemplateOverwritten<'_> {
    fn log(&self) {
        tracing::debug!(kind = self.kind, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("registry", span_name = name, kind = self.kind, name = self.name)
    }
}
