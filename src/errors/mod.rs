// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod registry;
mod transformation;

pub use config::{ConfigError, SpecifierPosition};
pub use registry::NotFoundError;
pub use transformation::{FormatError, TransformError, TransformationError};

/// Any failure surfaced by the cookbook API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Transformation(#[from] TransformationError),
}

pub type Result<T> = std::result::Result<T, Error>;
