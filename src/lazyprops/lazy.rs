//! Lazy attributes: computed on every read, never stored.

use crate::context::{AccessContext, Computed};
use crate::field::ComputeFn;
use std::fmt;
use std::sync::Arc;

pub struct LazyAttr<O, V> {
    name: Arc<str>,
    compute: ComputeFn<O, V>,
}

impl<O, V> LazyAttr<O, V> {
    pub(crate) fn new(name: &str, compute: ComputeFn<O, V>) -> Self {
        Self {
            name: Arc::from(name),
            compute,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the compute function.
    ///
    /// `None` reads through the owning type (`OwnerRead`), `Some` through an
    /// instance (`InstanceRead`). The raw [`Computed`] is returned so wrapping
    /// layers can honor its cache override.
    pub fn read(&self, instance: Option<&O>) -> Computed<V> {
        let cx = AccessContext::for_read(&self.name, instance.is_some());
        tracing::trace!(field = %self.name, access = ?cx.kind(), "computing attribute");
        (self.compute)(instance, &cx)
    }

    /// Read and drop any cache override.
    pub fn value(&self, instance: Option<&O>) -> V {
        self.read(instance).into_value()
    }
}

impl<O, V> Clone for LazyAttr<O, V> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<O, V> fmt::Debug for LazyAttr<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyAttr").field("name", &self.name).finish()
    }
}
