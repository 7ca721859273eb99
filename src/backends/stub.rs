// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::TransformError;
use crate::value::{Arguments, Value};

/// Appends the text bound at position 0 (`suffix`) to text input.
pub fn suffix_transform(value: Value, args: &Arguments) -> Result<Value, TransformError> {
    let suffix = args.text_or(0, "suffix", "")?;
    Ok(Value::Text(value.into_text()? + suffix))
}

/// A transform that always fails, for testing failure scenarios
pub fn failing_transform(_value: Value, _args: &Arguments) -> Result<Value, TransformError> {
    Err(TransformError::Other("simulated failure".to_string()))
}
