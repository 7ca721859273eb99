// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Stage;
use crate::value::Value;

/// Receives every intermediate value of a traced pipeline run.
///
/// Called after each stage completes, with the stage index, the stage itself
/// and the value it produced. Observers cannot fail and cannot influence the
/// run; they exist for debugging.
pub trait Observer {
    fn observe(&mut self, index: usize, stage: &Stage, value: &Value);
}

impl<F> Observer for F
where
    F: FnMut(usize, &Stage, &Value),
{
    fn observe(&mut self, index: usize, stage: &Stage, value: &Value) {
        self(index, stage, value)
    }
}
