//! # Instance Storage
//!
//! Attributes cache and persist their values in storage owned by each
//! instance. Hosts expose that storage through the [`Storage`] trait; the
//! crate ships [`Slots`], a small heterogeneous name → value map that hosts
//! embed as a field.
//!
//! ## Resolution order
//!
//! Stored values always take precedence over computation. Settable attributes
//! check storage themselves ([`crate::attribute::Attribute::read`]); plain
//! caching attributes offer the same two-phase lookup through
//! [`crate::caching::CachingAttr::get`].
//!
//! `Slots` uses interior mutability so a read through `&instance` can cache.
//! Borrows never outlive a single `Slots` call, so compute functions are free
//! to read other attributes of the same instance.

use crate::error::{PropsError, Result};
use indexmap::IndexMap;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;

/// Access to an instance's attribute storage.
pub trait Storage {
    /// The instance's slots, or `None` when the instance structurally cannot
    /// hold attributes.
    fn slots(&self) -> Option<&Slots>;
}

/// Per-instance attribute storage.
#[derive(Default)]
pub struct Slots {
    values: RefCell<IndexMap<String, Box<dyn Any>>>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the stored value.
    ///
    /// Returns `Ok(None)` when nothing is stored under `name`, and
    /// `PropsError::SlotType` when the stored value is not a `V`.
    pub fn get<V: Clone + 'static>(&self, name: &str) -> Result<Option<V>> {
        let values = self.values.borrow();
        let Some(stored) = values.get(name) else {
            return Ok(None);
        };
        stored
            .downcast_ref::<V>()
            .cloned()
            .map(Some)
            .ok_or_else(|| PropsError::SlotType {
                field: name.to_string(),
            })
    }

    /// Run `f` on the stored value without copying it out.
    ///
    /// The slots stay borrowed while `f` runs, so `f` must not write to this
    /// instance's attributes.
    pub fn with<V: 'static, R>(&self, name: &str, f: impl FnOnce(&V) -> R) -> Result<Option<R>> {
        let values = self.values.borrow();
        let Some(stored) = values.get(name) else {
            return Ok(None);
        };
        let value = stored
            .downcast_ref::<V>()
            .ok_or_else(|| PropsError::SlotType {
                field: name.to_string(),
            })?;
        Ok(Some(f(value)))
    }

    /// Store a value, replacing whatever was there.
    pub fn set<V: 'static>(&self, name: &str, value: V) {
        self.values
            .borrow_mut()
            .insert(name.to_string(), Box::new(value));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    /// Forget a stored value. Returns `true` if one was present.
    pub fn remove(&self, name: &str) -> bool {
        self.values.borrow_mut().shift_remove(name).is_some()
    }

    pub fn clear(&self) {
        self.values.borrow_mut().clear();
    }

    /// Names of the stored values, in the order they were first stored.
    pub fn names(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl fmt::Debug for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slots").field("names", &self.names()).finish()
    }
}

impl Storage for Slots {
    fn slots(&self) -> Option<&Slots> {
        Some(self)
    }
}
