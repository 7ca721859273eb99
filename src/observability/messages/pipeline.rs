// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline execution events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline run lifecycle (start, completion)
//! * Stage failures
//! * Traced (observed) stage results
//!
//! Only value kinds and sizes are ever recorded.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Pipeline run started.
///
/// # Log Level
/// `debug!` - Pipelines run often; the start is a diagnostic event
///
/// # Example
/// ```
/// use the_cookbook::observability::messages::pipeline::PipelineRunStarted;
///
/// let msg = PipelineRunStarted {
///     pipeline: "sha256_hex",
///     stage_count: 3,
///     input_kind: "text",
/// };
///
/// assert_eq!(msg.to_string(), "Pipeline 'sha256_hex' started: 3 stages, input=text");
/// ```
pub struct PipelineRunStarted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
    pub input_kind: &'static str,
}

impl Display for PipelineRunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' started: {} stages, input={}",
            self.pipeline, self.stage_count, self.input_kind
        )
    }
}

impl StructuredLog for PipelineRunStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            input_kind = self.input_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pipeline",
            span_name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// Pipeline run completed successfully.
///
/// # Log Level
/// `debug!` - Diagnostic event
pub struct PipelineRunCompleted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
    pub output_kind: &'static str,
    pub duration: Duration,
}

impl Display for PipelineRunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' completed: {} stages, output={}, duration={:?}",
            self.pipeline, self.stage_count, self.output_kind, self.duration
        )
    }
}

impl StructuredLog for PipelineRunCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            output_kind = self.output_kind,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pipeline",
            span_name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// A stage failed and the run was aborted.
///
/// # Log Level
/// `warn!` - The error is returned to the caller, who decides how bad it is
///
/// # Example
/// ```
/// use the_cookbook::observability::messages::pipeline::StageFailed;
///
/// let msg = StageFailed {
///     pipeline: "unseal",
///     step: Some("aead_decrypt"),
///     position: 1,
///     error_kind: "authentication",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Pipeline 'unseal' aborted at stage 1 ('aead_decrypt'): authentication error"
/// );
/// ```
pub struct StageFailed<'a> {
    pub pipeline: &'a str,
    pub step: Option<&'a str>,
    pub position: usize,
    pub error_kind: &'static str,
}

impl Display for StageFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' aborted at stage {} ('{}'): {} error",
            self.pipeline,
            self.position,
            self.step.unwrap_or("bare transform"),
            self.error_kind
        )
    }
}

impl StructuredLog for StageFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline = self.pipeline,
            step = self.step.unwrap_or("bare transform"),
            position = self.position,
            error_kind = self.error_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "stage",
            span_name = name,
            pipeline = self.pipeline,
            position = self.position,
        )
    }
}

/// A traced run produced an intermediate value.
///
/// # Log Level
/// `debug!` - Only emitted when a caller asked for tracing
pub struct StageObserved<'a> {
    pub position: usize,
    pub stage: &'a str,
    pub value_kind: &'static str,
    pub value_size: usize,
}

impl Display for StageObserved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage {} {} produced {} (size={})",
            self.position, self.stage, self.value_kind, self.value_size
        )
    }
}

impl StructuredLog for StageObserved<'_> {
    fn log(&self) {
        tracing::debug!(
            position = self.position,
            stage = self.stage,
            value_kind = self.value_kind,
            value_size = self.value_size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage",
            span_name = name,
            position = self.position,
            stage = self.stage,
        )
    }
}
