//! # Models
//!
//! Collection attributes hold models: keyed, cloneable, mergeable values that
//! are built from raw configuration. This module defines what the merge engine
//! needs from them and ships [`ConfigModel`], a JSON-backed implementation.
//!
//! | Contract | Used for |
//! |----------|----------|
//! | [`Model::key`] | Keying entries in a [`KeyedCollection`](crate::collection::KeyedCollection) |
//! | [`Model::kind`] | Recognizing ready-made value models, which are cloned as-is |
//! | [`Model::merge_with`] | Layering an entry over the defaults entry |
//! | [`ModelFactory`] | Building models from unkeyed or keyed raw configuration |

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

mod config_model;

pub use config_model::{ConfigFactory, ConfigModel};

/// Tag naming the kind of a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelKind(Cow<'static, str>);

impl ModelKind {
    /// The generic value kind. Entries that already are value models are
    /// cloned instead of rebuilt.
    pub const VALUE: ModelKind = ModelKind(Cow::Borrowed("val"));

    pub const fn from_static(name: &'static str) -> Self {
        ModelKind(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        ModelKind(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_value(&self) -> bool {
        *self == Self::VALUE
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A keyed, cloneable, mergeable model.
pub trait Model: Clone {
    fn key(&self) -> &str;

    fn kind(&self) -> &ModelKind;

    /// Layer `other` over `self`: `other`'s non-empty fields win, everything
    /// else is inherited from `self`. Not required to be commutative.
    fn merge_with(self, other: &Self) -> Self;
}

/// Raw input for a single entry: configuration data, or a model built
/// elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Raw<M> {
    Config(serde_json::Value),
    Model(M),
}

impl<M> From<serde_json::Value> for Raw<M> {
    fn from(value: serde_json::Value) -> Self {
        Raw::Config(value)
    }
}

/// Builds models from raw configuration.
pub trait ModelFactory<M> {
    /// The kind of model this factory produces.
    fn kind(&self) -> &ModelKind;

    /// Build a model from an unkeyed entry.
    fn from_config(&self, raw: Raw<M>) -> Result<M>;

    /// Build a model from an entry that arrived with a key.
    fn from_keyed_config(&self, key: &str, raw: Raw<M>) -> Result<M>;
}
