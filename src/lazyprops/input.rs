//! Raw input accepted by collection attributes.
//!
//! A collection can be written either as a mapping (ordered `key → config`
//! pairs) or as a sequence of entries, where each entry is a `(key, config)`
//! pair or a bare config with no key.
//!
//! ## JSON shapes
//!
//! | JSON | Input |
//! |------|-------|
//! | `null` | nothing (the write is a no-op) |
//! | `{"a": {...}, "b": {...}}` | `Mapping`, in document order |
//! | `[{...}, ["b", {...}], [null, {...}]]` | `Entries`: bare, keyed, bare |
//!
//! Inside an array, a nested array is a tuple and must have exactly two
//! elements with a string or `null` key. Anything else is a shape error.

use crate::error::{PropsError, Result};
use crate::model::Raw;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry<M> {
    Keyed(String, Raw<M>),
    Bare(Raw<M>),
}

impl<M> RawEntry<M> {
    pub fn keyed(key: impl Into<String>, raw: impl Into<Raw<M>>) -> Self {
        RawEntry::Keyed(key.into(), raw.into())
    }

    pub fn bare(raw: impl Into<Raw<M>>) -> Self {
        RawEntry::Bare(raw.into())
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            RawEntry::Keyed(key, _) => Some(key),
            RawEntry::Bare(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionInput<M> {
    /// Items-producing input: ordered `(key, raw)` pairs.
    Mapping(Vec<(String, Raw<M>)>),
    /// A sequence of entries, keyed or bare.
    Entries(Vec<RawEntry<M>>),
}

impl<M> CollectionInput<M> {
    pub fn mapping<I, K, R>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<Raw<M>>,
    {
        CollectionInput::Mapping(
            items
                .into_iter()
                .map(|(key, raw)| (key.into(), raw.into()))
                .collect(),
        )
    }

    pub fn entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RawEntry<M>>,
    {
        CollectionInput::Entries(entries.into_iter().collect())
    }

    /// Flatten into an ordered list of entries.
    pub fn into_entries(self) -> Vec<RawEntry<M>> {
        match self {
            CollectionInput::Mapping(items) => items
                .into_iter()
                .map(|(key, raw)| RawEntry::Keyed(key, raw))
                .collect(),
            CollectionInput::Entries(entries) => entries,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionInput::Mapping(items) => items.len(),
            CollectionInput::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interpret a JSON document as collection input.
    ///
    /// Returns `Ok(None)` for `null`.
    pub fn from_json(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Self::mapping(map))),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| entry_from_json(index, item))
                .collect::<Result<Vec<_>>>()
                .map(|entries| Some(CollectionInput::Entries(entries))),
            other => Err(PropsError::Document(format!(
                "expected an object or an array of entries, got {}",
                other
            ))),
        }
    }
}

fn entry_from_json<M>(index: usize, item: Value) -> Result<RawEntry<M>> {
    let Value::Array(tuple) = item else {
        return Ok(RawEntry::Bare(Raw::Config(item)));
    };
    let [key, raw]: [Value; 2] = tuple.try_into().map_err(|tuple: Vec<Value>| {
        PropsError::shape(
            index,
            format!("expected a (key, value) pair, got {} elements", tuple.len()),
        )
    })?;
    match key {
        Value::String(key) => Ok(RawEntry::Keyed(key, Raw::Config(raw))),
        Value::Null => Ok(RawEntry::Bare(Raw::Config(raw))),
        other => Err(PropsError::shape(
            index,
            format!("entry key must be a string or null, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigModel;
    use serde_json::json;

    type Input = CollectionInput<ConfigModel>;

    #[test]
    fn null_is_no_input() {
        assert!(Input::from_json(Value::Null).unwrap().is_none());
    }

    #[test]
    fn object_becomes_ordered_mapping() {
        let input = Input::from_json(json!({"b": {"x": 1}, "a": {"x": 2}}))
            .unwrap()
            .unwrap();
        let keys: Vec<_> = input
            .into_entries()
            .iter()
            .map(|entry| entry.key().map(str::to_string))
            .collect();
        assert_eq!(keys, vec![Some("b".to_string()), Some("a".to_string())]);
    }

    #[test]
    fn array_mixes_bare_and_keyed_entries() {
        let input = Input::from_json(json!([
            {"key": "a"},
            ["b", {"x": 1}],
            [null, {"x": 2}],
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(
            input.into_entries(),
            vec![
                RawEntry::bare(json!({"key": "a"})),
                RawEntry::keyed("b", json!({"x": 1})),
                RawEntry::bare(json!({"x": 2})),
            ]
        );
    }

    #[test]
    fn wrong_tuple_length_is_shape_error() {
        let err = Input::from_json(json!([{"x": 1}, ["a", {}, {}]])).unwrap_err();
        assert!(matches!(err, PropsError::Shape { index: 1, .. }));
    }

    #[test]
    fn non_string_key_is_shape_error() {
        let err = Input::from_json(json!([[1, {}]])).unwrap_err();
        assert!(matches!(err, PropsError::Shape { index: 0, .. }));
    }

    #[test]
    fn scalar_document_is_document_error() {
        let err = Input::from_json(json!("deps")).unwrap_err();
        assert!(matches!(err, PropsError::Document(_)));
        assert_eq!(
            err.to_string(),
            "Malformed collection document: expected an object or an array of entries, got \"deps\""
        );
        assert!(matches!(
            Input::from_json(json!(3)).unwrap_err(),
            PropsError::Document(_)
        ));
    }

    #[test]
    fn mapping_flattens_to_keyed_entries() {
        let input = Input::mapping(vec![("a", json!(1)), ("b", json!(2))]);
        assert_eq!(input.len(), 2);
        assert!(input
            .into_entries()
            .iter()
            .all(|entry| matches!(entry, RawEntry::Keyed(..))));
    }

    #[test]
    fn entries_keep_their_shape() {
        let input = Input::entries(vec![RawEntry::bare(json!(1))]);
        assert_eq!(input.into_entries(), vec![RawEntry::bare(json!(1))]);
    }
}
