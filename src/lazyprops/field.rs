//! Field definitions.
//!
//! A [`Field`] is an unbound attribute: a compute function plus optional
//! configuration. It becomes a descriptor when registered on a
//! [`crate::schema::SchemaBuilder`], which assigns and freezes its name.
//!
//! Three construction shapes are supported and end up in the same state once
//! registered:
//!
//! ```ignore
//! // Compute function directly; the name comes from the slot it is registered under.
//! Field::new(|pkg: Option<&Package>, _cx| Computed::Plain(pkg.map(|p| p.len()).unwrap_or(0)));
//!
//! // Explicit name, which wins over the slot name.
//! Field::named("size", |_, _| Computed::Plain(0));
//!
//! // Configure first, attach the function afterwards.
//! Field::configure().name("size").cache(false).compute(|_, _| Computed::Plain(0));
//! ```

use crate::context::{AccessContext, Computed, WriteOutcome};
use crate::error::{PropsError, Result};
use std::fmt;
use std::sync::Arc;

pub type ComputeFn<O, V> =
    Arc<dyn Fn(Option<&O>, &AccessContext<'_, V>) -> Computed<V> + Send + Sync>;

pub type WriteFn<O, V> =
    Arc<dyn Fn(Option<&O>, &AccessContext<'_, V>) -> Result<WriteOutcome<V>> + Send + Sync>;

pub struct Field<O, V> {
    name: Option<String>,
    cache: Option<bool>,
    compute: Option<ComputeFn<O, V>>,
    on_write: Option<WriteFn<O, V>>,
}

impl<O: 'static, V: 'static> Field<O, V> {
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(Option<&O>, &AccessContext<'_, V>) -> Computed<V> + Send + Sync + 'static,
    {
        Self::configure().compute(compute)
    }

    pub fn named<F>(name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(Option<&O>, &AccessContext<'_, V>) -> Computed<V> + Send + Sync + 'static,
    {
        Self::configure().name(name).compute(compute)
    }

    /// Start a field with no function attached yet.
    pub fn configure() -> Self {
        Self {
            name: None,
            cache: None,
            compute: None,
            on_write: None,
        }
    }

    /// A field that always computes the same value.
    pub fn constant(value: V) -> Self
    where
        V: Clone + Send + Sync,
    {
        Self::new(move |_, _| Computed::Plain(value.clone()))
    }

    /// A field that computes `V::default()`.
    pub fn default_value() -> Self
    where
        V: Default,
    {
        Self::new(|_, _| Computed::Plain(V::default()))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the schema's default cache flag for this field.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn compute<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<&O>, &AccessContext<'_, V>) -> Computed<V> + Send + Sync + 'static,
    {
        self.compute = Some(Arc::new(compute));
        self
    }

    /// Attach a hook that validates or transforms written values.
    pub fn on_write<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&O>, &AccessContext<'_, V>) -> Result<WriteOutcome<V>>
            + Send
            + Sync
            + 'static,
    {
        self.on_write = Some(Arc::new(hook));
        self
    }
}

impl<O, V> Field<O, V> {
    /// Freeze the field for registration under `slot` on `owner`.
    ///
    /// An explicit name set on the field wins over the slot name.
    pub(crate) fn bind(self, owner: &str, slot: &str) -> Result<BoundField<O, V>> {
        let name = self.name.unwrap_or_else(|| slot.to_string());
        let Some(compute) = self.compute else {
            return Err(PropsError::MissingCompute {
                owner: owner.to_string(),
                field: name,
            });
        };
        Ok(BoundField {
            name,
            cache: self.cache,
            compute,
            on_write: self.on_write,
        })
    }
}

impl<O, V> fmt::Debug for Field<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("cache", &self.cache)
            .field("has_compute", &self.compute.is_some())
            .field("has_write_hook", &self.on_write.is_some())
            .finish()
    }
}

/// A field whose name is fixed.
pub(crate) struct BoundField<O, V> {
    pub name: String,
    pub cache: Option<bool>,
    pub compute: ComputeFn<O, V>,
    pub on_write: Option<WriteFn<O, V>>,
}
