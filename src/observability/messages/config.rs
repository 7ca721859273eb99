// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for cookbook loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A cookbook file was read and registered.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_cookbook::observability::messages::config::CookbookLoaded;
///
/// let msg = CookbookLoaded {
///     source: "configs/cookbook.yaml",
///     step_count: 2,
///     pipeline_count: 3,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Loaded cookbook 'configs/cookbook.yaml': 2 steps, 3 pipelines"
/// );
/// ```
pub struct CookbookLoaded<'a> {
    pub source: &'a str,
    pub step_count: usize,
    pub pipeline_count: usize,
}

impl Display for CookbookLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded cookbook '{}': {} steps, {} pipelines",
            self.source, self.step_count, self.pipeline_count
        )
    }
}

impl StructuredLog for CookbookLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            source = self.source,
            step_count = self.step_count,
            pipeline_count = self.pipeline_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("cookbook", span_name = name, source = self.source)
    }
}
