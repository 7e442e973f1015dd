//! # Schemas
//!
//! A schema is where attributes are declared for an owning type. The
//! [`SchemaBuilder`] turns each [`Field`] into a descriptor, fixing its name
//! (the field's explicit name, or the slot it is registered under) and its
//! cache flag (the field's own, or `cache_by_default` from [`PropsConfig`]).
//! Names are unique per owner.
//!
//! Descriptors are plain values. Hosts usually keep them together in a struct
//! built once, for example behind a `once_cell::sync::Lazy`:
//!
//! ```ignore
//! struct PackageFields {
//!     name: Attribute<Package, String>,
//!     dependencies: CollectionAttribute<Package, ConfigModel>,
//! }
//!
//! static FIELDS: Lazy<PackageFields> = Lazy::new(|| {
//!     let mut schema = SchemaBuilder::new("Package");
//!     PackageFields {
//!         name: schema.attribute("name", Field::default_value()).unwrap(),
//!         dependencies: schema
//!             .collection("dependencies", ConfigFactory::new(DEP), Field::default_value())
//!             .unwrap(),
//!     }
//! });
//! ```

use crate::attribute::Attribute;
use crate::caching::CachingAttr;
use crate::collection::KeyedCollection;
use crate::config::PropsConfig;
use crate::error::{PropsError, Result};
use crate::field::{BoundField, Field, WriteFn};
use crate::lazy::LazyAttr;
use crate::merge::MergeOptions;
use crate::model::{Model, ModelFactory};
use crate::model_attribute::{CollectionAttribute, ModelAttribute};
use indexmap::IndexSet;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct SchemaBuilder<O> {
    owner: String,
    config: PropsConfig,
    names: IndexSet<String>,
    _owner: PhantomData<fn(&O)>,
}

impl<O> SchemaBuilder<O> {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            config: PropsConfig::default(),
            names: IndexSet::new(),
            _owner: PhantomData,
        }
    }

    pub fn with_config(mut self, config: PropsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PropsConfig {
        &self.config
    }

    fn register<V>(&mut self, slot: &str, field: Field<O, V>) -> Result<BoundField<O, V>> {
        let bound = field.bind(&self.owner, slot)?;
        if !self.names.insert(bound.name.clone()) {
            return Err(PropsError::DuplicateField {
                owner: self.owner.clone(),
                field: bound.name,
            });
        }
        tracing::trace!(owner = %self.owner, field = %bound.name, "registered field");
        Ok(bound)
    }

    /// A computed attribute that is never stored.
    pub fn lazy<V>(&mut self, slot: &str, field: Field<O, V>) -> Result<LazyAttr<O, V>> {
        let bound = self.register(slot, field)?;
        Ok(LazyAttr::new(&bound.name, bound.compute))
    }

    /// A computed attribute cached on first instance read.
    pub fn caching<V>(&mut self, slot: &str, field: Field<O, V>) -> Result<CachingAttr<O, V>> {
        let bound = self.register(slot, field)?;
        Ok(self.cached(bound).0)
    }

    /// A cached attribute that can also be written.
    pub fn attribute<V>(&mut self, slot: &str, field: Field<O, V>) -> Result<Attribute<O, V>> {
        let bound = self.register(slot, field)?;
        let (caching, on_write) = self.cached(bound);
        Ok(Attribute::new(caching, on_write))
    }

    /// An attribute holding a keyed collection of models built by `factory`.
    ///
    /// Writes run the collection merge with this schema's defaults key and
    /// collision policy.
    pub fn collection<M, F>(
        &mut self,
        slot: &str,
        factory: F,
        field: Field<O, KeyedCollection<M>>,
    ) -> Result<CollectionAttribute<O, M>>
    where
        M: Model,
        F: ModelFactory<M> + Send + Sync + 'static,
    {
        let attribute = self.attribute(slot, field)?;
        Ok(CollectionAttribute::new(
            attribute,
            Arc::new(factory),
            MergeOptions::from_config(&self.config),
        ))
    }

    /// An attribute holding a single model built by `factory`.
    pub fn model<M, F>(
        &mut self,
        slot: &str,
        factory: F,
        field: Field<O, M>,
    ) -> Result<ModelAttribute<O, M>>
    where
        M: Model,
        F: ModelFactory<M> + Send + Sync + 'static,
    {
        let attribute = self.attribute(slot, field)?;
        Ok(ModelAttribute::new(attribute, Arc::new(factory)))
    }

    pub fn finish(self) -> Schema {
        Schema {
            owner: self.owner,
            fields: self.names.into_iter().collect(),
        }
    }

    fn cached<V>(&self, bound: BoundField<O, V>) -> (CachingAttr<O, V>, Option<WriteFn<O, V>>) {
        let cache = bound.cache.unwrap_or(self.config.cache_by_default);
        let lazy = LazyAttr::new(&bound.name, bound.compute);
        (CachingAttr::new(lazy, cache), bound.on_write)
    }
}

/// Names registered on an owner, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    owner: String,
    fields: Vec<String>,
}

impl Schema {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
