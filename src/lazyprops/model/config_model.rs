use super::{Model, ModelFactory, ModelKind, Raw};
use crate::config::PropsConfig;
use crate::error::{PropsError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A model whose fields are plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigModel {
    kind: ModelKind,
    key: String,
    #[serde(default)]
    fields: IndexMap<String, Value>,
}

impl ConfigModel {
    pub fn new(kind: ModelKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            fields: IndexMap::new(),
        }
    }

    /// A ready-made value model. Collection writes clone these instead of
    /// rebuilding them.
    pub fn value(key: impl Into<String>) -> Self {
        Self::new(ModelKind::VALUE, key)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }
}

/// Values that do not override anything when merged.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

impl Model for ConfigModel {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> &ModelKind {
        &self.kind
    }

    fn merge_with(mut self, other: &Self) -> Self {
        if !other.key.is_empty() {
            self.key = other.key.clone();
        }
        for (name, value) in &other.fields {
            if !is_empty_value(value) {
                self.fields.insert(name.clone(), value.clone());
            }
        }
        self
    }
}

/// Builds [`ConfigModel`]s of one kind from JSON configuration.
///
/// Object configs become the model's fields, except for the key field
/// (`"key"` unless configured otherwise), which supplies the key of unkeyed
/// entries. Any other non-null config is stored under a single `value` field.
#[derive(Debug, Clone)]
pub struct ConfigFactory {
    kind: ModelKind,
    key_field: String,
}

impl ConfigFactory {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            key_field: PropsConfig::default().key_field,
        }
    }

    pub fn for_config(config: &PropsConfig, kind: ModelKind) -> Self {
        Self::new(kind).with_key_field(config.key_field.clone())
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    fn build(&self, key: Option<&str>, raw: Raw<ConfigModel>) -> Result<ConfigModel> {
        let config = match raw {
            Raw::Model(mut model) => {
                model.kind = self.kind.clone();
                if let Some(key) = key {
                    model.key = key.to_string();
                }
                return Ok(model);
            }
            Raw::Config(config) => config,
        };

        let mut model = ConfigModel::new(self.kind.clone(), key.unwrap_or_default());
        match config {
            Value::Null => {}
            Value::Object(map) => {
                for (name, value) in map {
                    if name != self.key_field {
                        model.fields.insert(name, value);
                        continue;
                    }
                    if let Some(key) = key {
                        if !value.is_null() {
                            tracing::debug!(
                                kind = %self.kind,
                                key,
                                embedded = %value,
                                "explicit key overrides embedded key field"
                            );
                        }
                        continue;
                    }
                    match value {
                        Value::String(embedded) => model.key = embedded,
                        Value::Null => {}
                        other => {
                            return Err(PropsError::Model(format!(
                                "{} key field '{}' must be a string, got {}",
                                self.kind, self.key_field, other
                            )))
                        }
                    }
                }
            }
            other => {
                model.fields.insert("value".to_string(), other);
            }
        }
        Ok(model)
    }
}

impl ModelFactory<ConfigModel> for ConfigFactory {
    fn kind(&self) -> &ModelKind {
        &self.kind
    }

    fn from_config(&self, raw: Raw<ConfigModel>) -> Result<ConfigModel> {
        self.build(None, raw)
    }

    fn from_keyed_config(&self, key: &str, raw: Raw<ConfigModel>) -> Result<ConfigModel> {
        self.build(Some(key), raw)
    }
}
