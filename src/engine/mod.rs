// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Steps, pipelines and their execution.

pub mod observers;
pub mod pipeline;
pub mod specifier;
pub mod step;


pub use observers::{RecordingObserver, TracingObserver};
pub use pipeline::{Pipeline, Stage};
pub use specifier::Specifier;
pub use step::Step;
