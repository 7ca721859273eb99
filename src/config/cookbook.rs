// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;

use crate::backends::local::LocalTransformFactory;
use crate::config::loader::{load_config, value_from_yaml, CookbookConfig, PipelineConfig, StepConfig};
use crate::config::registry::Registry;
use crate::engine::{Pipeline, Specifier, Step};
use crate::errors::{ConfigError, Error, NotFoundError};
use crate::observability::messages::config::CookbookLoaded;
use crate::observability::messages::StructuredLog;
use crate::value::{IntoPositional, NamedArgs, Value};

/// The step and pipeline registries an application works with.
///
/// A cookbook is an ordinary value; two cookbooks never see each other's
/// templates.
///
/// # Examples
///
/// ## Built-in catalog
/// ```
/// use the_cookbook::config::Cookbook;
/// use the_cookbook::value::Value;
///
/// let cookbook = Cookbook::with_builtins();
/// let digest = cookbook.pipeline("sha256_hex").unwrap().run(Value::from("hello")).unwrap();
/// assert_eq!(
///     digest,
///     Value::from("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
/// );
/// ```
///
/// ## From a cookbook file
/// ```
/// use the_cookbook::config::{parse_yaml, Cookbook};
/// use the_cookbook::value::Value;
///
/// let cfg = parse_yaml(r#"
/// steps:
///   - name: colon_hex
///     from: bytes_to_hex
///     args: ":"
/// pipelines:
///   - name: fingerprint
///     steps: [[str_to_bytes, utf8], colon_hex]
/// "#).unwrap();
///
/// let cookbook = Cookbook::from_config(&cfg).unwrap();
/// let out = cookbook.pipeline("fingerprint").unwrap().run(Value::from("hi")).unwrap();
/// assert_eq!(out, Value::from("68:69"));
/// ```
#[derive(Debug, Default)]
pub struct Cookbook {
    steps: Registry<Step>,
    pipelines: Registry<Pipeline>,
}

impl Cookbook {
    /// An empty cookbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in transform catalog and recipes.
    pub fn with_builtins() -> Self {
        let cookbook = Self::new();
        LocalTransformFactory::register_builtins(&cookbook.steps);
        LocalTransformFactory::register_recipes(&cookbook.pipelines);
        cookbook
    }

    /// The built-ins plus every entry of `cfg`.
    pub fn from_config(cfg: &CookbookConfig) -> Result<Self, ConfigError> {
        let cookbook = Self::with_builtins();
        cookbook.apply(cfg, "<inline>")?;
        Ok(cookbook)
    }

    /// The built-ins plus every entry of the cookbook file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = load_config(path)?;
        let cookbook = Self::with_builtins();
        cookbook.apply(&cfg, &path.display().to_string())?;
        Ok(cookbook)
    }

    /// Register the entries of `cfg`, steps first, each in file order.
    ///
    /// Stops at the first bad entry; entries before it stay registered.
    pub fn apply(&self, cfg: &CookbookConfig, source: &str) -> Result<(), ConfigError> {
        for step in &cfg.steps {
            self.add_configured_step(step)?;
        }
        for pipeline in &cfg.pipelines {
            self.add_configured_pipeline(pipeline)
                .map_err(|source| ConfigError::Pipeline {
                    pipeline: pipeline.name.clone(),
                    source: Box::new(source),
                })?;
        }

        CookbookLoaded {
            source,
            step_count: cfg.steps.len(),
            pipeline_count: cfg.pipelines.len(),
        }
        .log();
        Ok(())
    }

    pub fn steps(&self) -> &Registry<Step> {
        &self.steps
    }

    pub fn pipelines(&self) -> &Registry<Pipeline> {
        &self.pipelines
    }

    /// Build a pipeline from specifiers against this cookbook's steps.
    pub fn build<I>(&self, specifiers: I) -> Result<Pipeline, Error>
    where
        I: IntoIterator<Item = Specifier>,
    {
        Ok(Pipeline::from_specifiers(specifiers, &self.steps)?)
    }

    /// Build a pipeline from dynamic specifier values.
    pub fn build_from_values<I>(&self, values: I) -> Result<Pipeline, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        Pipeline::from_values(values, &self.steps)
    }

    /// A private copy of the pipeline template `name`.
    pub fn pipeline(&self, name: &str) -> Result<Pipeline, NotFoundError> {
        self.pipelines.get(name)
    }

    /// A private copy of the step template `name`.
    pub fn step(&self, name: &str) -> Result<Step, NotFoundError> {
        self.steps.get(name)
    }

    pub fn add_step(&self, name: impl Into<String>, step: Step) -> Option<Step> {
        self.steps.add(name, step)
    }

    pub fn add_pipeline(&self, name: impl Into<String>, pipeline: Pipeline) -> Option<Pipeline> {
        let name = name.into();
        let pipeline = pipeline.named(name.clone());
        self.pipelines.add(name, pipeline)
    }

    /// Run the pipeline template `name` on `value`.
    pub fn run(&self, name: &str, value: Value) -> Result<Value, Error> {
        Ok(self.pipeline(name)?.run(value)?)
    }

    fn add_configured_step(&self, cfg: &StepConfig) -> Result<(), ConfigError> {
        let base = self
            .steps
            .get(&cfg.from)
            .map_err(|source| ConfigError::UnknownReference {
                entry: cfg.name.clone(),
                source,
            })?;
        let invalid = |e: ConfigError| ConfigError::InvalidStep {
            step: cfg.name.clone(),
            reason: e.to_string(),
        };

        let positional = cfg
            .args
            .clone()
            .map(value_from_yaml)
            .transpose()
            .map_err(invalid)?
            .map(IntoPositional::into_positional);

        let named = match &cfg.kwargs {
            None => None,
            Some(kwargs) => {
                let mut named = NamedArgs::new();
                for (key, value) in kwargs {
                    named.insert(key.clone(), value_from_yaml(value.clone()).map_err(invalid)?);
                }
                Some(named)
            }
        };

        let step = base.with_overrides(positional, named).renamed(&cfg.name);
        self.steps.add(cfg.name.clone(), step);
        Ok(())
    }

    // A name that is not a step but an earlier pipeline nests that pipeline.
    fn add_configured_pipeline(&self, cfg: &PipelineConfig) -> Result<(), ConfigError> {
        let mut specifiers = Vec::with_capacity(cfg.steps.len());
        for (index, entry) in cfg.steps.iter().enumerate() {
            let value = value_from_yaml(entry.clone()).map_err(|e| e.at(index))?;
            let specifier = match Specifier::try_from(value).map_err(|e| e.at(index))? {
                Specifier::Named(name) if !self.steps.contains(&name) => {
                    match self.pipelines.try_get(&name) {
                        Some(nested) => Specifier::transform(nested),
                        None => Specifier::Named(name),
                    }
                }
                specifier => specifier,
            };
            specifiers.push(specifier);
        }

        let pipeline = Pipeline::from_specifiers(specifiers, &self.steps)
            .map_err(|source| ConfigError::UnknownReference {
                entry: cfg.name.clone(),
                source,
            })?
            .named(cfg.name.clone());
        self.pipelines.add(cfg.name.clone(), pipeline);
        Ok(())
    }
}
