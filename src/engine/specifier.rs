// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::engine::Step;
use crate::errors::{ConfigError, SpecifierPosition, TransformError};
use crate::traits::Transform;
use crate::value::{Arguments, IntoPositional, NamedArgs, Value};

/// One entry of a pipeline definition.
pub enum Specifier {
    /// A transform used as-is, without a name or bound arguments.
    Bare(Arc<dyn Transform>),
    /// A step template looked up in the step registry.
    Named(String),
    /// A step template looked up and then given overrides.
    NamedWithOverrides {
        name: String,
        positional: Option<Vec<Value>>,
        named: Option<NamedArgs>,
    },
    /// A ready step, used without any lookup.
    Prebuilt(Step),
}

impl Specifier {
    /// A bare unary function.
    pub fn bare<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Specifier::Bare(Arc::new(move |value: Value, _: &Arguments| f(value)))
    }

    /// Any transform (a pipeline, for instance) used as a bare stage.
    pub fn transform(transform: impl Transform + 'static) -> Self {
        Specifier::Bare(Arc::new(transform))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Specifier::Named(name.into())
    }

    pub fn with_args(name: impl Into<String>, positional: impl IntoPositional) -> Self {
        Specifier::NamedWithOverrides {
            name: name.into(),
            positional: Some(positional.into_positional()),
            named: None,
        }
    }

    /// Named overrides only; the template's positional arguments stay bound.
    pub fn with_kwargs(name: impl Into<String>, named: NamedArgs) -> Self {
        Specifier::NamedWithOverrides {
            name: name.into(),
            positional: None,
            named: Some(named),
        }
    }

    /// Positional replaced wholesale (`()` clears them) and named merged.
    pub fn with_overrides(
        name: impl Into<String>,
        positional: impl IntoPositional,
        named: NamedArgs,
    ) -> Self {
        Specifier::NamedWithOverrides {
            name: name.into(),
            positional: Some(positional.into_positional()),
            named: Some(named),
        }
    }

    /// Parse an override tuple `[name]`, `[name, positional]` or
    /// `[name, positional, named]`.
    ///
    /// A scalar positional element is normalized to a one-element list and
    /// `null` means "no override". Anything else is a [`ConfigError`].
    pub fn from_tuple(items: Vec<Value>) -> Result<Self, ConfigError> {
        let arity = items.len();
        if !(1..=3).contains(&arity) {
            return Err(ConfigError::UnsupportedArity {
                position: SpecifierPosition::default(),
                arity,
            });
        }

        let mut items = items.into_iter();
        let name = match items.next() {
            Some(Value::Text(name)) => name,
            other => {
                return Err(ConfigError::invalid_specifier(format!(
                    "step name must be text, found {}",
                    other.as_ref().map_or("nothing", Value::kind)
                )))
            }
        };

        let positional = match items.next() {
            None | Some(Value::Null) => None,
            Some(Value::Map(_)) => {
                return Err(ConfigError::invalid_specifier(
                    "positional overrides must be a list or a scalar, found map",
                ))
            }
            Some(value) => Some(value.into_positional()),
        };

        let named = match items.next() {
            None | Some(Value::Null) => None,
            Some(Value::Map(named)) => Some(named),
            Some(other) => {
                return Err(ConfigError::invalid_specifier(format!(
                    "named overrides must be a map, found {}",
                    other.kind()
                )))
            }
        };

        Ok(if positional.is_none() && named.is_none() {
            Specifier::Named(name)
        } else {
            Specifier::NamedWithOverrides {
                name,
                positional,
                named,
            }
        })
    }
}

impl TryFrom<Value> for Specifier {
    type Error = ConfigError;

    /// Text is a step name and a list is an override tuple.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(name) => Ok(Specifier::Named(name)),
            Value::List(items) => Specifier::from_tuple(items),
            other => Err(ConfigError::invalid_specifier(format!(
                "expected a step name or an override tuple, found {}",
                other.kind()
            ))),
        }
    }
}

impl From<&str> for Specifier {
    fn from(name: &str) -> Self {
        Specifier::Named(name.to_string())
    }
}

impl From<String> for Specifier {
    fn from(name: String) -> Self {
        Specifier::Named(name)
    }
}

impl From<Step> for Specifier {
    fn from(step: Step) -> Self {
        Specifier::Prebuilt(step)
    }
}

impl fmt::Debug for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specifier::Bare(_) => write!(f, "Bare"),
            Specifier::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Specifier::NamedWithOverrides {
                name,
                positional,
                named,
            } => f
                .debug_struct("NamedWithOverrides")
                .field("name", name)
                .field("positional", &positional.as_ref().map(Vec::len))
                .field("named", &named.as_ref().map(|n| n.keys().collect::<Vec<_>>()))
                .finish(),
            Specifier::Prebuilt(step) => f.debug_tuple("Prebuilt").field(step).finish(),
        }
    }
}
