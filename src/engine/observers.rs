// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ready-made observers for traced pipeline runs.

use crate::engine::Stage;
use crate::observability::messages::pipeline::StageObserved;
use crate::observability::messages::StructuredLog;
use crate::traits::Observer;
use crate::value::Value;

/// Emits one `debug!` event per stage with the value kind and size.
///
/// The value itself is never logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&mut self, index: usize, stage: &Stage, value: &Value) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        let label = stage.to_string();
        StageObserved {
            position: index,
            stage: &label,
            value_kind: value.kind(),
            value_size: value.size(),
        }
        .log();
    }
}

/// One intermediate value captured by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub index: usize,
    pub label: String,
    pub value: Value,
}

/// Keeps a copy of every intermediate value, for debugging and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub entries: Vec<Snapshot>,
}

impl Observer for RecordingObserver {
    fn observe(&mut self, index: usize, stage: &Stage, value: &Value) {
        self.entries.push(Snapshot {
            index,
            label: stage.to_string(),
            value: value.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::backends::stub::suffix_transform;
    use crate::engine::Step;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn observe_at(level: tracing::Level) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let stage = Stage::Step(Step::new("tag", suffix_transform).with_args("-x"));
        tracing::subscriber::with_default(subscriber, || {
            TracingObserver.observe(3, &stage, &Value::from("secret value"));
        });

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_tracing_observer_logs_shape_at_debug() {
        let output = observe_at(tracing::Level::DEBUG);
        assert!(output.contains("Step<tag *args>"));
        assert!(output.contains("produced text"));
        assert!(!output.contains("secret value"));
    }

    #[test]
    fn test_tracing_observer_is_silent_above_debug() {
        assert!(observe_at(tracing::Level::INFO).is_empty());
    }

    #[test]
    fn test_recording_observer_keeps_every_value() {
        let stage = Stage::Step(Step::new("tag", suffix_transform));
        let mut recorder = RecordingObserver::default();
        recorder.observe(0, &stage, &Value::from("a"));
        recorder.observe(1, &stage, &Value::Int(2));

        assert_eq!(recorder.entries.len(), 2);
        assert_eq!(recorder.entries[1].value, Value::Int(2));
        assert_eq!(recorder.entries[0].label, "Step<tag>");
    }
}
