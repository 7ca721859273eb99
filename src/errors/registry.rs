// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A strict registry lookup asked for a name that was never registered.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} '{name}' is not registered")]
pub struct NotFoundError {
    /// Template kind held by the registry ("step" or "pipeline").
    pub kind: &'static str,
    pub name: String,
}

impl NotFoundError {
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}
