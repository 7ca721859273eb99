// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::errors::NotFoundError;
use crate::observability::messages::registry::{TemplateOverwritten, TemplateRegistered};
use crate::observability::messages::StructuredLog;

/// Something a registry can hand out copies of.
pub trait Template: Clone {
    /// Name of the template kind, used in lookup errors and logs.
    const KIND: &'static str;
}

/// Name-keyed store of templates.
///
/// Every lookup returns an independent clone, so callers may rebind or extend
/// what they get back without affecting the stored template or other callers.
/// Names are kept in registration order; overwriting keeps the original slot.
pub struct Registry<T> {
    entries: RwLock<IndexMap<String, T>>,
}

impl<T: Template> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Store `template` under `name`, returning whatever it replaced.
    pub fn add(&self, name: impl Into<String>, template: T) -> Option<T> {
        let name = name.into();
        let mut entries = self.write();
        let previous = entries.insert(name.clone(), template);
        match previous {
            Some(_) => TemplateOverwritten {
                kind: T::KIND,
                name: &name,
            }
            .log(),
            None => TemplateRegistered {
                kind: T::KIND,
                name: &name,
                total: entries.len(),
            }
            .log(),
        }
        previous
    }

    pub fn get(&self, name: &str) -> Result<T, NotFoundError> {
        self.try_get(name)
            .ok_or_else(|| NotFoundError::new(T::KIND, name))
    }

    pub fn try_get(&self, name: &str) -> Option<T> {
        self.read().get(name).cloned()
    }

    pub fn get_or(&self, name: &str, default: T) -> T {
        self.try_get(name).unwrap_or(default)
    }

    /// Registered names, first registration first.
    pub fn list(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Registered names containing `needle`, in registration order.
    pub fn search(&self, needle: &str) -> Vec<String> {
        self.read()
            .keys()
            .filter(|name| name.contains(needle))
            .cloned()
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Entries are only ever replaced whole, so a panic in another thread
    // cannot leave the map half-written.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, T>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Template> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Template> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &T::KIND)
            .field("names", &self.list())
            .finish()
    }
}
