//! Ordered, unique-key collections of models.

use crate::model::Model;
use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use serde::Serialize;

/// An ordered mapping from key to model.
///
/// Keys are unique and keep the position of their first insertion; inserting
/// an existing key replaces the value in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyedCollection<M> {
    entries: IndexMap<String, M>,
}

impl<M> KeyedCollection<M> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Build from `(key, model)` pairs. Later duplicates replace earlier
    /// values but keep the earlier position.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, M)>,
    {
        pairs.into_iter().collect()
    }

    /// Insert a model, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, model: M) -> Option<M> {
        self.entries.insert(key.into(), model)
    }

    pub fn get(&self, key: &str) -> Option<&M> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &M> {
        self.entries.values()
    }

    pub fn iter(&self) -> Iter<'_, String, M> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: Model> KeyedCollection<M> {
    /// Build from models, keyed by each model's own key.
    pub fn from_models<I>(models: I) -> Self
    where
        I: IntoIterator<Item = M>,
    {
        models
            .into_iter()
            .map(|model| (model.key().to_string(), model))
            .collect()
    }

    /// Whether every key equals the key of the model stored under it.
    pub fn is_consistent(&self) -> bool {
        self.entries.iter().all(|(key, model)| key == model.key())
    }
}

impl<M> Default for KeyedCollection<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> FromIterator<(String, M)> for KeyedCollection<M> {
    fn from_iter<I: IntoIterator<Item = (String, M)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<M> IntoIterator for KeyedCollection<M> {
    type Item = (String, M);
    type IntoIter = IntoIter<String, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a KeyedCollection<M> {
    type Item = (&'a String, &'a M);
    type IntoIter = Iter<'a, String, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
