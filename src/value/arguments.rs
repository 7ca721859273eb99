// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;

use super::Value;
use crate::errors::TransformError;

/// Named arguments bound to a step.
pub type NamedArgs = BTreeMap<String, Value>;

/// Arguments bound to a step and handed to its transform on every call.
///
/// A transform reads an argument by position or by name; when both are
/// present the named one wins. `Value::Null` counts as absent so callers can
/// clear a default by binding `null`.
#[derive(Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    named: NamedArgs,
}

impl Arguments {
    pub fn new(positional: Vec<Value>, named: NamedArgs) -> Self {
        Self { positional, named }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &NamedArgs {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn set_positional(&mut self, positional: impl IntoPositional) {
        self.positional = positional.into_positional();
    }

    pub fn set_named(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.named.insert(name.into(), value.into());
    }

    /// Positional replaced wholesale when given, named merged key by key.
    pub fn merged(&self, positional: Option<Vec<Value>>, named: Option<NamedArgs>) -> Self {
        let mut merged = self.clone();
        if let Some(positional) = positional {
            merged.positional = positional;
        }
        if let Some(named) = named {
            merged.named.extend(named);
        }
        merged
    }

    /// Look up an argument by name, falling back to its position.
    pub fn get(&self, index: usize, name: &str) -> Option<&Value> {
        self.named
            .get(name)
            .or_else(|| self.positional.get(index))
            .filter(|v| !v.is_null())
    }

    pub fn text(&self, index: usize, name: &str) -> Result<Option<&str>, TransformError> {
        match self.get(index, name) {
            None => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s)),
            Some(other) => Err(invalid(name, "text", other)),
        }
    }

    pub fn text_or<'a>(
        &'a self,
        index: usize,
        name: &str,
        default: &'a str,
    ) -> Result<&'a str, TransformError> {
        Ok(self.text(index, name)?.unwrap_or(default))
    }

    /// Bytes, or text taken as its UTF-8 encoding.
    pub fn bytes(&self, index: usize, name: &str) -> Result<Option<&[u8]>, TransformError> {
        match self.get(index, name) {
            None => Ok(None),
            Some(Value::Bytes(b)) => Ok(Some(b)),
            Some(Value::Text(s)) => Ok(Some(s.as_bytes())),
            Some(other) => Err(invalid(name, "bytes", other)),
        }
    }

    pub fn required_bytes(&self, index: usize, name: &str) -> Result<&[u8], TransformError> {
        self.bytes(index, name)?
            .ok_or_else(|| TransformError::MissingArgument(name.to_string()))
    }

    pub fn usize(&self, index: usize, name: &str) -> Result<Option<usize>, TransformError> {
        match self.get(index, name) {
            None => Ok(None),
            Some(Value::Int(i)) => usize::try_from(*i).map(Some).map_err(|_| {
                TransformError::InvalidArgument {
                    name: name.to_string(),
                    reason: "expected a non-negative integer".to_string(),
                }
            }),
            Some(other) => Err(invalid(name, "int", other)),
        }
    }

    pub fn u32(&self, index: usize, name: &str) -> Result<Option<u32>, TransformError> {
        match self.get(index, name) {
            None => Ok(None),
            Some(Value::Int(i)) => u32::try_from(*i).map(Some).map_err(|_| {
                TransformError::InvalidArgument {
                    name: name.to_string(),
                    reason: "expected an integer in 0..=4294967295".to_string(),
                }
            }),
            Some(other) => Err(invalid(name, "int", other)),
        }
    }

    pub fn boolean(&self, index: usize, name: &str) -> Result<Option<bool>, TransformError> {
        match self.get(index, name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(invalid(name, "bool", other)),
        }
    }
}

fn invalid(name: &str, expected: &str, found: &Value) -> TransformError {
    TransformError::InvalidArgument {
        name: name.to_string(),
        reason: format!("expected {}, found {}", expected, found.kind()),
    }
}

// Argument values may hold keys or secrets, so only their shape is shown.
impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field(
                "positional",
                &self.positional.iter().map(Value::kind).collect::<Vec<_>>(),
            )
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Normalization of positional arguments.
///
/// Nothing becomes an empty sequence, a single scalar becomes a one-element
/// sequence and sequences are copied.
pub trait IntoPositional {
    fn into_positional(self) -> Vec<Value>;
}

impl IntoPositional for () {
    fn into_positional(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoPositional for Vec<Value> {
    fn into_positional(self) -> Vec<Value> {
        self
    }
}

impl IntoPositional for &[Value] {
    fn into_positional(self) -> Vec<Value> {
        self.to_vec()
    }
}

impl<T: IntoPositional> IntoPositional for Option<T> {
    fn into_positional(self) -> Vec<Value> {
        self.map(IntoPositional::into_positional).unwrap_or_default()
    }
}

impl IntoPositional for Value {
    fn into_positional(self) -> Vec<Value> {
        match self {
            Value::Null => Vec::new(),
            Value::List(items) => items,
            scalar => vec![scalar],
        }
    }
}

macro_rules! impl_scalar_positional {
    ($($ty:ty),*) => {
        $(
            impl IntoPositional for $ty {
                fn into_positional(self) -> Vec<Value> {
                    vec![Value::from(self)]
                }
            }
        )*
    };
}

impl_scalar_positional!(&str, String, Vec<u8>, &[u8], i64, i32, u32, u8, bool, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_normalization() {
        assert!(().into_positional().is_empty());
        assert!(None::<Vec<Value>>.into_positional().is_empty());
        assert_eq!("utf8".into_positional(), vec![Value::Text("utf8".into())]);
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).into_positional(),
            vec![Value::Int(1), Value::Int(2)]
        );
        assert_eq!(vec![0u8, 1].into_positional(), vec![Value::Bytes(vec![0, 1])]);
    }

    #[test]
    fn test_named_wins_over_positional() {
        let mut named = NamedArgs::new();
        named.insert("encoding".into(), Value::from("ascii"));
        let args = Arguments::new(vec![Value::from("utf8")], named);

        assert_eq!(args.text(0, "encoding").unwrap(), Some("ascii"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let args = Arguments::new(vec![Value::Null], NamedArgs::new());
        assert_eq!(args.text_or(0, "sep", ":").unwrap(), ":");
    }

    #[test]
    fn test_merged_replaces_positional_and_merges_named() {
        let mut named = NamedArgs::new();
        named.insert("a".into(), Value::Int(1));
        named.insert("b".into(), Value::Int(2));
        let base = Arguments::new(vec![Value::Int(9)], named);

        let mut overrides = NamedArgs::new();
        overrides.insert("b".into(), Value::Int(20));
        let merged = base.merged(Some(vec![]), Some(overrides));

        assert!(merged.positional().is_empty());
        assert_eq!(merged.named()["a"], Value::Int(1));
        assert_eq!(merged.named()["b"], Value::Int(20));
        // base untouched
        assert_eq!(base.positional(), &[Value::Int(9)]);
        assert_eq!(base.named()["b"], Value::Int(2));
    }

    #[test]
    fn test_typed_accessors_report_argument_name() {
        let args = Arguments::new(vec![Value::from("x")], NamedArgs::new());
        let err = args.usize(0, "length").unwrap_err();
        match err {
            TransformError::InvalidArgument { name, reason } => {
                assert_eq!(name, "length");
                assert!(reason.contains("found text"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            Arguments::empty().required_bytes(0, "key"),
            Err(TransformError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_debug_hides_argument_values() {
        let args = Arguments::new(vec![Value::from("hunter2")], NamedArgs::new());
        let rendered = format!("{:?}", args);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("text"));
    }
}
