//! Model-valued attributes.
//!
//! [`CollectionAttribute`] stores a [`KeyedCollection`] assembled from raw
//! input by the merge pipeline in [`crate::merge`]. [`ModelAttribute`] is the
//! single-model counterpart. Both read like any settable attribute and store
//! through the same write path, so a field's write hook sees the final,
//! merged value.

use crate::attribute::{Attribute, Resolved};
use crate::collection::KeyedCollection;
use crate::error::Result;
use crate::input::{CollectionInput, RawEntry};
use crate::merge::{self, MergeOptions};
use crate::model::{Model, ModelFactory, ModelKind, Raw};
use crate::storage::Storage;
use std::fmt;
use std::sync::Arc;

pub type SharedFactory<M> = Arc<dyn ModelFactory<M> + Send + Sync>;

pub struct CollectionAttribute<O, M> {
    attribute: Attribute<O, KeyedCollection<M>>,
    factory: SharedFactory<M>,
    options: MergeOptions,
}

impl<O, M> CollectionAttribute<O, M> {
    pub(crate) fn new(
        attribute: Attribute<O, KeyedCollection<M>>,
        factory: SharedFactory<M>,
        options: MergeOptions,
    ) -> Self {
        Self {
            attribute,
            factory,
            options,
        }
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    /// Kind of the models this collection holds.
    pub fn model(&self) -> &ModelKind {
        self.factory.kind()
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn attribute(&self) -> &Attribute<O, KeyedCollection<M>> {
        &self.attribute
    }
}

impl<O: Storage, M: Model + 'static> CollectionAttribute<O, M> {
    pub fn read(&self, instance: &O) -> Result<Resolved<KeyedCollection<M>>> {
        self.attribute.read(instance)
    }

    /// Run `f` on the stored collection without copying it.
    pub fn with<R>(
        &self,
        instance: &O,
        f: impl FnOnce(&KeyedCollection<M>) -> R,
    ) -> Result<Resolved<R>> {
        self.attribute.with(instance, f)
    }

    /// Merge `value` into a collection and store it.
    ///
    /// `None` leaves whatever is stored untouched.
    pub fn write(&self, instance: &O, value: Option<CollectionInput<M>>) -> Result<()> {
        let Some(value) = value else {
            tracing::trace!(field = %self.name(), "ignoring absent collection write");
            return Ok(());
        };
        let collection = merge::merge_collection(self.factory.as_ref(), value, &self.options)?;
        tracing::debug!(field = %self.name(), entries = collection.len(), "storing collection");
        self.attribute.write(instance, collection)
    }

    /// Write a JSON document; see [`CollectionInput::from_json`] for the
    /// accepted shapes.
    pub fn write_json(&self, instance: &O, value: serde_json::Value) -> Result<()> {
        self.write(instance, CollectionInput::from_json(value)?)
    }
}

impl<O, M> Clone for CollectionAttribute<O, M> {
    fn clone(&self) -> Self {
        Self {
            attribute: self.attribute.clone(),
            factory: Arc::clone(&self.factory),
            options: self.options.clone(),
        }
    }
}

impl<O, M> fmt::Debug for CollectionAttribute<O, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionAttribute")
            .field("name", &self.name())
            .field("options", &self.options)
            .finish()
    }
}

pub struct ModelAttribute<O, M> {
    attribute: Attribute<O, M>,
    factory: SharedFactory<M>,
}

impl<O, M> ModelAttribute<O, M> {
    pub(crate) fn new(attribute: Attribute<O, M>, factory: SharedFactory<M>) -> Self {
        Self { attribute, factory }
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    pub fn model(&self) -> &ModelKind {
        self.factory.kind()
    }
}

impl<O: Storage, M: Model + 'static> ModelAttribute<O, M> {
    pub fn read(&self, instance: &O) -> Result<Resolved<M>> {
        self.attribute.read(instance)
    }

    /// Build a model from `value` and store it. `None` is a no-op.
    pub fn write(&self, instance: &O, value: Option<Raw<M>>) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let model = merge::reify(self.factory.as_ref(), RawEntry::Bare(value))?;
        self.attribute.write(instance, model)
    }
}

impl<O, M> Clone for ModelAttribute<O, M> {
    fn clone(&self) -> Self {
        Self {
            attribute: self.attribute.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<O, M> fmt::Debug for ModelAttribute<O, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAttribute")
            .field("name", &self.name())
            .finish()
    }
}
