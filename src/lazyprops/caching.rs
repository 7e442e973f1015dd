//! Caching attributes.
//!
//! A [`CachingAttr`] wraps a [`LazyAttr`] and freezes computed values into the
//! instance's [`Slots`](crate::storage::Slots). Whether a value is frozen is
//! decided per evaluation: the descriptor's `cache_enabled` flag is the
//! default, and a compute function can override it by returning
//! [`Computed::Overridden`](crate::context::Computed::Overridden).
//!
//! `read` always computes. Use `get` for the two-phase lookup that serves a
//! previously cached value before computing.

use crate::error::{PropsError, Result};
use crate::lazy::LazyAttr;
use crate::storage::Storage;
use std::fmt;

pub struct CachingAttr<O, V> {
    lazy: LazyAttr<O, V>,
    cache_enabled: bool,
}

impl<O, V> CachingAttr<O, V> {
    pub(crate) fn new(lazy: LazyAttr<O, V>, cache_enabled: bool) -> Self {
        Self {
            lazy,
            cache_enabled,
        }
    }

    pub fn name(&self) -> &str {
        self.lazy.name()
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn lazy(&self) -> &LazyAttr<O, V> {
        &self.lazy
    }
}

impl<O: Storage, V: Clone + 'static> CachingAttr<O, V> {
    /// Compute the value and cache it on the instance when allowed.
    ///
    /// Owner reads (`None`) are never stored anywhere.
    pub fn read(&self, instance: Option<&O>) -> Result<V> {
        let (cache, value) = self.lazy.read(instance).resolve(self.cache_enabled);
        let Some(instance) = instance else {
            return Ok(value);
        };
        if cache {
            self.store(instance, value.clone())?;
        }
        Ok(value)
    }

    /// Serve the cached value if there is one, otherwise `read`.
    pub fn get(&self, instance: &O) -> Result<V> {
        if let Some(slots) = instance.slots() {
            if let Some(value) = slots.get::<V>(self.name())? {
                return Ok(value);
            }
        }
        self.read(Some(instance))
    }

    /// Write a value into the instance's storage as if it had just been
    /// computed.
    pub(crate) fn store(&self, instance: &O, value: V) -> Result<()> {
        let slots = instance.slots().ok_or_else(|| PropsError::NoStorage {
            field: self.name().to_string(),
        })?;
        tracing::trace!(field = %self.name(), "caching attribute value");
        slots.set(self.name(), value);
        Ok(())
    }

    /// Drop the cached value so the next `get` recomputes.
    pub fn invalidate(&self, instance: &O) -> bool {
        instance
            .slots()
            .is_some_and(|slots| slots.remove(self.name()))
    }
}

impl<O, V> Clone for CachingAttr<O, V> {
    fn clone(&self) -> Self {
        Self {
            lazy: self.lazy.clone(),
            cache_enabled: self.cache_enabled,
        }
    }
}

impl<O, V> fmt::Debug for CachingAttr<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingAttr")
            .field("name", &self.name())
            .field("cache_enabled", &self.cache_enabled)
            .finish()
    }
}
