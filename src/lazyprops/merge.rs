//! # Collection Merge
//!
//! Turns raw collection input into a [`KeyedCollection`] of models:
//!
//! 1. Flatten the input into ordered entries ([`CollectionInput::into_entries`]).
//! 2. Reify each entry into a model: ready-made value models are taken as-is,
//!    bare entries go through [`ModelFactory::from_config`], keyed entries
//!    through [`ModelFactory::from_keyed_config`].
//! 3. Assemble by each model's own key. Duplicates replace in place.
//! 4. If a defaults entry exists, rebuild every entry (the defaults entry
//!    included) as `defaults.clone().merge_with(entry)` and re-key the result
//!    by the merged keys.
//!
//! Merging can change keys, for instance when an entry without a key inherits
//! one from the defaults. Two entries that end up with the same key collide;
//! [`CollisionPolicy`] decides whether the later one silently wins, wins with
//! a warning, or fails the merge.

use crate::collection::KeyedCollection;
use crate::config::{CollisionPolicy, PropsConfig, DEFAULT_DEFAULTS_KEY};
use crate::error::{PropsError, Result};
use crate::input::{CollectionInput, RawEntry};
use crate::model::{Model, ModelFactory, Raw};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub defaults_key: String,
    pub collision: CollisionPolicy,
}

impl MergeOptions {
    pub fn from_config(config: &PropsConfig) -> Self {
        Self {
            defaults_key: config.defaults_key.clone(),
            collision: config.key_collision,
        }
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            defaults_key: DEFAULT_DEFAULTS_KEY.to_string(),
            collision: CollisionPolicy::default(),
        }
    }
}

/// Run the whole pipeline on one input.
pub fn merge_collection<M, F>(
    factory: &F,
    input: CollectionInput<M>,
    options: &MergeOptions,
) -> Result<KeyedCollection<M>>
where
    M: Model,
    F: ModelFactory<M> + ?Sized,
{
    let entries = input.into_entries();
    tracing::debug!(kind = %factory.kind(), entries = entries.len(), "assembling collection");

    let mut assembled = KeyedCollection::new();
    for entry in entries {
        let model = reify(factory, entry)?;
        let key = model.key().to_string();
        assembled.insert(key, model);
    }
    apply_defaults(assembled, options)
}

/// Build the model for a single entry.
pub fn reify<M, F>(factory: &F, entry: RawEntry<M>) -> Result<M>
where
    M: Model,
    F: ModelFactory<M> + ?Sized,
{
    match entry {
        RawEntry::Keyed(_, Raw::Model(model)) | RawEntry::Bare(Raw::Model(model))
            if model.kind().is_value() =>
        {
            Ok(model)
        }
        RawEntry::Bare(raw) => factory.from_config(raw),
        RawEntry::Keyed(key, raw) => factory.from_keyed_config(&key, raw),
    }
}

/// Merge the defaults entry into every entry and re-key by merged keys.
///
/// Without a defaults entry the collection is returned untouched.
pub fn apply_defaults<M: Model>(
    collection: KeyedCollection<M>,
    options: &MergeOptions,
) -> Result<KeyedCollection<M>> {
    let Some(defaults) = collection.get(&options.defaults_key).cloned() else {
        return Ok(collection);
    };
    tracing::debug!(
        defaults_key = %options.defaults_key,
        entries = collection.len(),
        "merging defaults into collection"
    );

    let mut merged = KeyedCollection::new();
    for (original_key, entry) in collection {
        let model = defaults.clone().merge_with(&entry);
        let key = model.key().to_string();
        if merged.contains_key(&key) {
            match options.collision {
                CollisionPolicy::Overwrite => {}
                CollisionPolicy::Warn => tracing::warn!(
                    key = %key,
                    entry = %original_key,
                    "merged entry replaces an earlier entry with the same key"
                ),
                CollisionPolicy::Reject => return Err(PropsError::KeyCollision { key }),
            }
        }
        merged.insert(key, model);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfigFactory, ConfigModel, ModelKind};
    use serde_json::{json, Value};
    use std::cell::RefCell;

    const DEP: ModelKind = ModelKind::from_static("dependency");
    static DEP_KIND: ModelKind = DEP;

    fn merge(input: Value) -> Result<KeyedCollection<ConfigModel>> {
        merge_with_policy(input, CollisionPolicy::Warn)
    }

    fn merge_with_policy(
        input: Value,
        collision: CollisionPolicy,
    ) -> Result<KeyedCollection<ConfigModel>> {
        let input = CollectionInput::from_json(input)?.expect("non-null input");
        let options = MergeOptions {
            collision,
            ..MergeOptions::default()
        };
        merge_collection(&ConfigFactory::new(DEP), input, &options)
    }

    /// Records which constructor each entry was routed to.
    #[derive(Default)]
    struct RecordingFactory {
        calls: RefCell<Vec<String>>,
    }

    impl ModelFactory<ConfigModel> for RecordingFactory {
        fn kind(&self) -> &ModelKind {
            &DEP_KIND
        }

        fn from_config(&self, raw: Raw<ConfigModel>) -> Result<ConfigModel> {
            self.calls.borrow_mut().push("unkeyed".to_string());
            ConfigFactory::new(DEP).from_config(raw)
        }

        fn from_keyed_config(&self, key: &str, raw: Raw<ConfigModel>) -> Result<ConfigModel> {
            self.calls.borrow_mut().push(format!("keyed:{}", key));
            ConfigFactory::new(DEP).from_keyed_config(key, raw)
        }
    }

    #[test]
    fn recording_factory_reports_its_kind() {
        let factory = RecordingFactory::default();
        assert_eq!(factory.kind(), &DEP);
    }

    #[test]
    fn defaults_propagate_into_entries() {
        let merged = merge(json!({"_/_": {"a": 1, "b": 2}, "x": {"b": 3}})).unwrap();

        let x = merged.get("x").unwrap();
        assert_eq!(x.get("a"), Some(&json!(1)));
        assert_eq!(x.get("b"), Some(&json!(3)));
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["_/_", "x"]);
        assert!(merged.is_consistent());
    }

    #[test]
    fn defaults_entry_merges_into_itself() {
        let merged = merge(json!({"_/_": {"a": 1}, "x": {}})).unwrap();
        let defaults = merged.get("_/_").unwrap();
        assert_eq!(defaults.key(), "_/_");
        assert_eq!(defaults.get("a"), Some(&json!(1)));
    }

    #[test]
    fn no_defaults_passes_through() {
        let input = json!([["x", {"b": 3}], {"key": "y", "c": 4}]);
        let merged = merge(input.clone()).unwrap();

        let entries: Vec<RawEntry<ConfigModel>> = CollectionInput::from_json(input)
            .unwrap()
            .unwrap()
            .into_entries();
        let factory = ConfigFactory::new(DEP);
        let assembled = KeyedCollection::from_models(
            entries.into_iter().map(|entry| reify(&factory, entry).unwrap()),
        );
        assert_eq!(merged, assembled);
    }

    #[test]
    fn bare_and_keyed_entries_use_matching_constructors() {
        let factory = RecordingFactory::default();
        let input: CollectionInput<ConfigModel> = CollectionInput::entries(vec![
            RawEntry::bare(json!({"key": "a"})),
            RawEntry::keyed("b", json!({})),
        ]);
        let merged = merge_collection(&factory, input, &MergeOptions::default()).unwrap();

        assert_eq!(*factory.calls.borrow(), vec!["unkeyed", "keyed:b"]);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn value_models_are_taken_without_the_factory() {
        let factory = RecordingFactory::default();
        let ready = ConfigModel::value("pinned").with_field("v", json!(1));
        let input: CollectionInput<ConfigModel> = CollectionInput::entries(vec![
            RawEntry::Bare(Raw::Model(ready.clone())),
            RawEntry::Keyed("other".into(), Raw::Model(ready.clone())),
        ]);
        let merged = merge_collection(&factory, input, &MergeOptions::default()).unwrap();

        assert!(factory.calls.borrow().is_empty());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("pinned"), Some(&ready));
    }

    #[test]
    fn non_value_models_go_through_the_factory() {
        let factory = RecordingFactory::default();
        let foreign = ConfigModel::new(ModelKind::from_static("script"), "s");
        let input = CollectionInput::entries(vec![RawEntry::Bare(Raw::Model(foreign))]);
        let merged = merge_collection(&factory, input, &MergeOptions::default()).unwrap();

        assert_eq!(*factory.calls.borrow(), vec!["unkeyed"]);
        assert_eq!(merged.get("s").unwrap().kind(), &DEP);
    }

    #[test]
    fn entries_keyed_by_model_key_not_raw_key() {
        let ready = ConfigModel::value("real");
        let input = CollectionInput::entries(vec![RawEntry::Keyed(
            "alias".into(),
            Raw::Model(ready),
        )]);
        let merged =
            merge_collection(&ConfigFactory::new(DEP), input, &MergeOptions::default()).unwrap();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["real"]);
    }

    #[test]
    fn duplicate_keys_before_merge_replace_in_place() {
        let merged = merge(json!([["a", {"n": 1}], ["b", {}], ["a", {"n": 2}]])).unwrap();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(merged.get("a").unwrap().get("n"), Some(&json!(2)));
    }

    #[test]
    fn unkeyed_entry_inherits_defaults_key_and_collides() {
        // The unkeyed entry has an empty key, so merging gives it "_/_".
        let input = json!([["_/_", {"a": 1}], {"b": 2}]);

        let merged = merge_with_policy(input.clone(), CollisionPolicy::Overwrite).unwrap();
        assert_eq!(merged.len(), 1);
        let survivor = merged.get("_/_").unwrap();
        assert_eq!(survivor.get("b"), Some(&json!(2)));

        let err = merge_with_policy(input, CollisionPolicy::Reject).unwrap_err();
        assert!(matches!(err, PropsError::KeyCollision { key } if key == "_/_"));
    }

    #[test]
    fn warn_policy_keeps_last_write() {
        let merged = merge_with_policy(
            json!([["_/_", {"a": 1}], {"b": 2}, {"b": 3}]),
            CollisionPolicy::Warn,
        )
        .unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("_/_").unwrap().get("b"), Some(&json!(3)));
    }

    #[test]
    fn custom_defaults_key() {
        let input: CollectionInput<ConfigModel> =
            CollectionInput::from_json(json!({"*": {"a": 1}, "x": {}}))
            .unwrap()
            .unwrap();
        let options = MergeOptions {
            defaults_key: "*".to_string(),
            ..MergeOptions::default()
        };
        let merged = merge_collection(&ConfigFactory::new(DEP), input, &options).unwrap();
        assert_eq!(merged.get("x").unwrap().get("a"), Some(&json!(1)));
    }

    #[test]
    fn factory_errors_propagate() {
        let err = merge(json!([{"key": 5}])).unwrap_err();
        assert!(matches!(err, PropsError::Model(_)));
    }

    #[test]
    fn options_follow_config() {
        let config = PropsConfig {
            defaults_key: "defaults".to_string(),
            key_collision: CollisionPolicy::Reject,
            ..PropsConfig::default()
        };
        let options = MergeOptions::from_config(&config);
        assert_eq!(options.defaults_key, "defaults");
        assert_eq!(options.collision, CollisionPolicy::Reject);
    }
}
