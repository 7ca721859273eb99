// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod observer;
pub mod transform;

pub use observer::Observer;
pub use transform::Transform;
