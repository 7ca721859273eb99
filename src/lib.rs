// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // transform catalog
pub mod config;     // registries + cookbook files
pub mod engine;     // steps, pipelines, observers
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // unified abstractions
pub mod value;      // dynamic values and arguments

pub use config::Cookbook;
pub use engine::{Pipeline, Specifier, Stage, Step};
pub use errors::{Error, Result};
pub use value::{Arguments, Value};
