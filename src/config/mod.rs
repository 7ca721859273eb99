// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Template registries and the cookbook files that fill them.

mod cookbook;
mod loader;
pub mod registry;

pub mod consts;

pub use cookbook::Cookbook;
pub use loader::{
    load_config, parse_toml, parse_yaml, value_from_yaml, CookbookConfig, PipelineConfig,
    StepConfig,
};
pub use registry::{Registry, Template};
