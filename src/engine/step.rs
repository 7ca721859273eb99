// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::config::registry::Template;
use crate::errors::TransformationError;
use crate::traits::Transform;
use crate::value::{Arguments, IntoPositional, NamedArgs, Value};

/// A named transform with its own bound arguments.
///
/// Cloning a step shares the transform but copies the arguments, so a clone
/// can be rebound (a different key, a different encoding) without touching
/// the step it came from.
///
/// # Examples
/// ```
/// use the_cookbook::backends::local::transforms::cast;
/// use the_cookbook::engine::Step;
/// use the_cookbook::value::Value;
///
/// let to_bytes = Step::new("str_to_bytes", cast::str_to_bytes).with_args("utf8");
/// let bytes = to_bytes.apply(Value::from("hi")).unwrap();
/// assert_eq!(bytes, Value::Bytes(b"hi".to_vec()));
/// ```
#[derive(Clone)]
pub struct Step {
    name: String,
    transform: Arc<dyn Transform>,
    arguments: Arguments,
}

impl Step {
    pub fn new(name: impl Into<String>, transform: impl Transform + 'static) -> Self {
        Self::from_shared(name, Arc::new(transform))
    }

    pub fn from_shared(name: impl Into<String>, transform: Arc<dyn Transform>) -> Self {
        Self {
            name: name.into(),
            transform,
            arguments: Arguments::empty(),
        }
    }

    /// Bind positional arguments. A single scalar becomes a one-element list.
    pub fn with_args(mut self, positional: impl IntoPositional) -> Self {
        self.arguments.set_positional(positional);
        self
    }

    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.set_named(name, value);
        self
    }

    pub fn with_kwargs(mut self, named: NamedArgs) -> Self {
        for (name, value) in named {
            self.arguments.set_named(name, value);
        }
        self
    }

    /// Same step under another name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn transform(&self) -> &Arc<dyn Transform> {
        &self.transform
    }

    pub fn set_positional(&mut self, positional: impl IntoPositional) {
        self.arguments.set_positional(positional);
    }

    pub fn set_named(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.arguments.set_named(name, value);
    }

    /// A clone with overrides applied: positional replaced wholesale, named
    /// merged key by key.
    pub fn with_overrides(&self, positional: Option<Vec<Value>>, named: Option<NamedArgs>) -> Self {
        Self {
            name: self.name.clone(),
            transform: Arc::clone(&self.transform),
            arguments: self.arguments.merged(positional, named),
        }
    }

    pub fn apply(&self, value: Value) -> Result<Value, TransformationError> {
        self.apply_at(value, None)
    }

    pub(crate) fn apply_at(
        &self,
        value: Value,
        position: Option<usize>,
    ) -> Result<Value, TransformationError> {
        self.transform
            .apply(value, &self.arguments)
            .map_err(|source| TransformationError::new(Some(self.name.clone()), position, source))
    }
}

impl Template for Step {
    const KIND: &'static str = "step";
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step<{}", self.name)?;
        if !self.arguments.positional().is_empty() {
            write!(f, " *args")?;
        }
        if !self.arguments.named().is_empty() {
            write!(f, " **kwargs")?;
        }
        write!(f, ">")
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
