// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TransformError;
use crate::value::{Arguments, Value};

/// A unary transformation parameterized by bound arguments.
///
/// Every plain function or closure with the signature
/// `Fn(Value, &Arguments) -> Result<Value, TransformError>` is a transform,
/// which is how the built-in catalog is written. Transforms hold no mutable
/// state and may be shared between any number of steps and threads.
pub trait Transform: Send + Sync {
    fn apply(&self, input: Value, args: &Arguments) -> Result<Value, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(Value, &Arguments) -> Result<Value, TransformError> + Send + Sync,
{
    fn apply(&self, input: Value, args: &Arguments) -> Result<Value, TransformError> {
        self(input, args)
    }
}
