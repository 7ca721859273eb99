// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::registry::{Registry, Template};
use crate::engine::{Specifier, Step};
use crate::errors::{ConfigError, Error, NotFoundError, TransformError, TransformationError};
use crate::observability::messages::pipeline::{
    PipelineRunCompleted, PipelineRunStarted, StageFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Observer, Transform};
use crate::value::{Arguments, Value};

/// One resolved entry of a pipeline.
#[derive(Clone)]
pub enum Stage {
    Step(Step),
    Bare(Arc<dyn Transform>),
}

impl Stage {
    /// Step name, `None` for bare transforms.
    pub fn name(&self) -> Option<&str> {
        match self {
            Stage::Step(step) => Some(step.name()),
            Stage::Bare(_) => None,
        }
    }

    pub fn as_step(&self) -> Option<&Step> {
        match self {
            Stage::Step(step) => Some(step),
            Stage::Bare(_) => None,
        }
    }

    fn apply_at(&self, value: Value, position: usize) -> Result<Value, TransformationError> {
        match self {
            Stage::Step(step) => step.apply_at(value, Some(position)),
            Stage::Bare(transform) => transform
                .apply(value, &Arguments::empty())
                .map_err(|source| TransformationError::new(None, Some(position), source)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Step(step) => write!(f, "{}", step),
            Stage::Bare(_) => write!(f, "<bare transform>"),
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Step(step) => f.debug_tuple("Step").field(step).finish(),
            Stage::Bare(_) => write!(f, "Bare"),
        }
    }
}

/// An ordered composition of stages run left to right.
///
/// Pipelines are plain values: cloning copies every step, and nothing a
/// running pipeline does is visible to any other pipeline.
///
/// # Examples
/// ```
/// use the_cookbook::config::Cookbook;
/// use the_cookbook::engine::Specifier;
/// use the_cookbook::value::Value;
///
/// let cookbook = Cookbook::with_builtins();
/// let pipeline = cookbook
///     .build([
///         Specifier::with_args("str_to_bytes", "utf8"),
///         Specifier::named("bytes_to_b64"),
///     ])
///     .unwrap();
///
/// assert_eq!(pipeline.run(Value::from("data")).unwrap(), Value::from("ZGF0YQ=="));
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    name: Option<String>,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from specifiers, resolving names through `steps`.
    ///
    /// Every specifier is resolved before the pipeline exists; the first
    /// unknown name aborts construction.
    pub fn from_specifiers<I>(specifiers: I, steps: &Registry<Step>) -> Result<Self, NotFoundError>
    where
        I: IntoIterator<Item = Specifier>,
    {
        let mut pipeline = Self::new();
        for specifier in specifiers {
            let stage = match specifier {
                Specifier::Bare(transform) => Stage::Bare(transform),
                Specifier::Named(name) => Stage::Step(steps.get(&name)?),
                Specifier::NamedWithOverrides {
                    name,
                    positional,
                    named,
                } => Stage::Step(steps.get(&name)?.with_overrides(positional, named)),
                Specifier::Prebuilt(step) => Stage::Step(step),
            };
            pipeline.stages.push(stage);
        }
        Ok(pipeline)
    }

    /// Build from dynamic specifier values (step names and override tuples).
    ///
    /// All values are converted before any lookup, so a malformed entry is
    /// reported with its position regardless of what precedes it.
    pub fn from_values<I>(values: I, steps: &Registry<Step>) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let specifiers = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Specifier::try_from(value).map_err(|e| e.at(index)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self::from_specifiers(specifiers, steps)?)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// First step with the given name, for rebinding arguments on a clone.
    pub fn step_mut(&mut self, name: &str) -> Option<&mut Step> {
        self.stages.iter_mut().find_map(|stage| match stage {
            Stage::Step(step) if step.name() == name => Some(step),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Thread `value` through every stage. Stops at the first failure.
    pub fn run(&self, value: Value) -> Result<Value, TransformationError> {
        self.execute(value, &mut Unobserved, "pipeline_run")
    }

    /// Like [`Pipeline::run`], reporting every intermediate value to `observer`.
    pub fn run_observed<O>(&self, value: Value, observer: &mut O) -> Result<Value, TransformationError>
    where
        O: Observer + ?Sized,
    {
        self.execute(value, observer, "pipeline_run_observed")
    }

    fn execute<O>(
        &self,
        value: Value,
        observer: &mut O,
        span_name: &str,
    ) -> Result<Value, TransformationError>
    where
        O: Observer + ?Sized,
    {
        let label = self.label();
        let started = PipelineRunStarted {
            pipeline: label,
            stage_count: self.stages.len(),
            input_kind: value.kind(),
        };
        let span = started.span(span_name);
        let _guard = span.enter();
        started.log();
        let start_time = Instant::now();

        let mut value = value;
        for (index, stage) in self.stages.iter().enumerate() {
            value = self.apply_logged(stage, value, index)?;
            observer.observe(index, stage, &value);
        }

        PipelineRunCompleted {
            pipeline: label,
            stage_count: self.stages.len(),
            output_kind: value.kind(),
            duration: start_time.elapsed(),
        }
        .log();
        Ok(value)
    }

    fn apply_logged(
        &self,
        stage: &Stage,
        value: Value,
        index: usize,
    ) -> Result<Value, TransformationError> {
        stage.apply_at(value, index).map_err(|error| {
            StageFailed {
                pipeline: self.label(),
                step: error.step.as_deref(),
                position: index,
                error_kind: error.kind(),
            }
            .log();
            error
        })
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Observer of plain runs.
struct Unobserved;

impl Observer for Unobserved {
    fn observe(&mut self, _index: usize, _stage: &Stage, _value: &Value) {}
}

impl Template for Pipeline {
    const KIND: &'static str = "pipeline";
}

/// A pipeline nests as a bare stage of another pipeline.
impl Transform for Pipeline {
    fn apply(&self, input: Value, _args: &Arguments) -> Result<Value, TransformError> {
        self.run(input)
            .map_err(|error| TransformError::Pipeline(Box::new(error)))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{failing_transform, suffix_transform};
    use crate::engine::observers::RecordingObserver;

    fn registry() -> Registry<Step> {
        let steps = Registry::new();
        steps.add("a", Step::new("a", suffix_transform).with_args("a"));
        steps.add("b", Step::new("b", suffix_transform).with_args("b"));
        steps.add("c", Step::new("c", suffix_transform).with_args("c"));
        steps.add("boom", Step::new("boom", failing_transform));
        steps
    }

    #[test]
    fn test_run_composes_left_to_right() {
        let steps = registry();
        let pipeline = Pipeline::from_specifiers(
            ["a", "b", "c"].map(Specifier::from),
            &steps,
        )
        .unwrap();

        let a = steps.get("a").unwrap();
        let b = steps.get("b").unwrap();
        let c = steps.get("c").unwrap();
        let composed = c
            .apply(b.apply(a.apply(Value::from("v")).unwrap()).unwrap())
            .unwrap();

        assert_eq!(pipeline.run(Value::from("v")).unwrap(), composed);
        assert_eq!(composed, Value::from("vabc"));
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run(Value::Int(7)).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_failure_stops_execution_and_reports_position() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let counting = Specifier::bare(|value| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        });

        let pipeline = Pipeline::from_specifiers(
            vec![Specifier::from("a"), Specifier::from("boom"), counting],
            &registry(),
        )
        .unwrap();

        let err = pipeline.run(Value::from("v")).unwrap_err();
        assert_eq!(err.step.as_deref(), Some("boom"));
        assert_eq!(err.position, Some(1));
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bare_failures_have_position_but_no_name() {
        let pipeline = Pipeline::from_specifiers(
            vec![Specifier::bare(|_| Err(TransformError::Other("nope".into())))],
            &registry(),
        )
        .unwrap();

        let err = pipeline.run(Value::Null).unwrap_err();
        assert_eq!(err.step, None);
        assert_eq!(err.position, Some(0));
    }

    #[test]
    fn test_unknown_name_fails_construction() {
        let err = Pipeline::from_specifiers(vec![Specifier::from("missing")], &registry())
            .unwrap_err();
        assert_eq!(err.kind, "step");
        assert_eq!(err.name, "missing");
    }

    #[test]
    fn test_from_values_reports_bad_specifier_position() {
        let values = vec![
            Value::from("a"),
            Value::List(vec![
                Value::from("b"),
                Value::List(vec![]),
                Value::Map(Default::default()),
                Value::from("extra"),
            ]),
        ];

        let err = Pipeline::from_values(values, &registry()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "specifier #1: override tuple must have 1 to 3 elements, got 4"
        );
    }

    #[test]
    fn test_from_values_checks_shape_before_lookup() {
        let values = vec![Value::from("missing"), Value::from(1)];
        let err = Pipeline::from_values(values, &registry()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_prebuilt_step_bypasses_registry() {
        let private = Step::new("private", suffix_transform).with_args("!");
        let pipeline =
            Pipeline::from_specifiers(vec![Specifier::from(private)], &Registry::new()).unwrap();
        assert_eq!(pipeline.run(Value::from("v")).unwrap(), Value::from("v!"));
    }

    #[test]
    fn test_overrides_apply_to_resolved_template_only() {
        let steps = registry();
        let pipeline =
            Pipeline::from_specifiers(vec![Specifier::with_args("a", "z")], &steps).unwrap();

        assert_eq!(pipeline.run(Value::from("v")).unwrap(), Value::from("vz"));
        assert_eq!(
            steps.get("a").unwrap().apply(Value::from("v")).unwrap(),
            Value::from("va")
        );
    }

    #[test]
    fn test_run_observed_reports_every_stage() {
        let pipeline = Pipeline::from_specifiers(
            vec![
                Specifier::from("a"),
                Specifier::bare(Ok),
                Specifier::from("c"),
            ],
            &registry(),
        )
        .unwrap();

        let mut recorder = RecordingObserver::default();
        let result = pipeline.run_observed(Value::from("v"), &mut recorder).unwrap();

        assert_eq!(result, pipeline.run(Value::from("v")).unwrap());
        let indices: Vec<usize> = recorder.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(recorder.entries[0].label, "Step<a *args>");
        assert_eq!(recorder.entries[1].label, "<bare transform>");
        assert_eq!(recorder.entries[2].value, Value::from("vac"));
    }

    #[test]
    fn test_run_observed_stops_notifying_after_failure() {
        let pipeline = Pipeline::from_specifiers(
            ["a", "boom", "c"].map(Specifier::from),
            &registry(),
        )
        .unwrap();

        let mut seen = Vec::new();
        let mut observer = |index: usize, _stage: &Stage, _value: &Value| seen.push(index);
        assert!(pipeline.run_observed(Value::from("v"), &mut observer).is_err());
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn test_plain_and_observed_runs_agree() {
        struct TestCase {
            name: &'static str,
            specifiers: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "empty",
                specifiers: vec![],
            },
            TestCase {
                name: "all succeed",
                specifiers: vec!["a", "b", "c"],
            },
            TestCase {
                name: "fails midway",
                specifiers: vec!["a", "boom", "c"],
            },
            TestCase {
                name: "fails first",
                specifiers: vec!["boom"],
            },
        ];

        let steps = registry();
        for test_case in test_cases {
            let pipeline = Pipeline::from_specifiers(
                test_case.specifiers.into_iter().map(Specifier::from),
                &steps,
            )
            .unwrap();

            let mut count = 0;
            let mut counter = |_: usize, _: &Stage, _: &Value| count += 1;
            let observed = pipeline.run_observed(Value::from("v"), &mut counter);
            let plain = pipeline.run(Value::from("v"));

            match (plain, observed) {
                (Ok(plain), Ok(observed)) => {
                    assert_eq!(plain, observed, "Test case '{}'", test_case.name);
                    assert_eq!(count, pipeline.len(), "Test case '{}'", test_case.name);
                }
                (Err(plain), Err(observed)) => {
                    assert_eq!(plain.step, observed.step, "Test case '{}'", test_case.name);
                    assert_eq!(plain.position, observed.position, "Test case '{}'", test_case.name);
                    assert_eq!(count, observed.position.unwrap(), "Test case '{}'", test_case.name);
                }
                (plain, observed) => panic!(
                    "Test case '{}': runs disagree ({:?} vs {:?})",
                    test_case.name, plain, observed
                ),
            }
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let original =
            Pipeline::from_specifiers(["a", "b"].map(Specifier::from), &registry()).unwrap();
        let mut clone = original.clone();
        clone.step_mut("b").unwrap().set_positional("X");
        clone.push(Stage::Bare(Arc::new(|v: Value, _: &Arguments| {
            Ok::<Value, TransformError>(v)
        })));

        assert_eq!(original.len(), 2);
        assert_eq!(original.run(Value::from("v")).unwrap(), Value::from("vab"));
        assert_eq!(clone.run(Value::from("v")).unwrap(), Value::from("vaX"));
    }

    #[test]
    fn test_pipeline_nests_as_bare_stage() {
        let steps = registry();
        let inner = Pipeline::from_specifiers(["a", "b"].map(Specifier::from), &steps)
            .unwrap()
            .named("inner");
        let outer = Pipeline::from_specifiers(
            vec![Specifier::transform(inner), Specifier::from("c")],
            &steps,
        )
        .unwrap();

        assert_eq!(outer.run(Value::from("v")).unwrap(), Value::from("vabc"));
    }

    #[test]
    fn test_nested_failure_keeps_inner_context() {
        let steps = registry();
        let inner = Pipeline::from_specifiers(["a", "boom"].map(Specifier::from), &steps).unwrap();
        let outer =
            Pipeline::from_specifiers(vec![Specifier::transform(inner)], &steps).unwrap();

        let err = outer.run(Value::from("v")).unwrap_err();
        assert_eq!(err.position, Some(0));
        match err.source {
            TransformError::Pipeline(inner) => {
                assert_eq!(inner.step.as_deref(), Some("boom"));
                assert_eq!(inner.position, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
