//! # Configuration
//!
//! Settings that shape how schemas and collection merges behave. They are
//! stored as JSON in `lazyprops.json` inside a config directory; a missing file
//! means all defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `defaults_key` | `_/_` | Key of the entry whose fields are merged into every other entry |
//! | `cache_by_default` | `true` | Cache flag for fields that do not set one |
//! | `key_collision` | `warn` | What to do when merged entries end up sharing a key: `overwrite`, `warn`, `reject` |
//! | `key_field` | `key` | Config field that names unkeyed entries |

use crate::error::{PropsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_FILENAME: &str = "lazyprops.json";
pub const DEFAULT_DEFAULTS_KEY: &str = "_/_";
const DEFAULT_KEY_FIELD: &str = "key";

/// Names accepted by [`PropsConfig::get`] and [`PropsConfig::set`].
pub const CONFIG_KEYS: &[&str] = &["defaults_key", "cache_by_default", "key_collision", "key_field"];

/// How to resolve entries whose keys collide after defaults are merged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Last write wins, silently.
    Overwrite,
    /// Last write wins, with a warning.
    #[default]
    Warn,
    /// Fail the write.
    Reject,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollisionPolicy::Overwrite => "overwrite",
            CollisionPolicy::Warn => "warn",
            CollisionPolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

impl FromStr for CollisionPolicy {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(CollisionPolicy::Overwrite),
            "warn" => Ok(CollisionPolicy::Warn),
            "reject" => Ok(CollisionPolicy::Reject),
            other => Err(PropsError::Config(format!(
                "Unknown collision policy '{}' (expected overwrite, warn or reject)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropsConfig {
    #[serde(default = "default_defaults_key")]
    pub defaults_key: String,

    #[serde(default = "default_cache")]
    pub cache_by_default: bool,

    #[serde(default)]
    pub key_collision: CollisionPolicy,

    #[serde(default = "default_key_field")]
    pub key_field: String,
}

fn default_defaults_key() -> String {
    DEFAULT_DEFAULTS_KEY.to_string()
}

fn default_cache() -> bool {
    true
}

fn default_key_field() -> String {
    DEFAULT_KEY_FIELD.to_string()
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            defaults_key: default_defaults_key(),
            cache_by_default: default_cache(),
            key_collision: CollisionPolicy::default(),
            key_field: default_key_field(),
        }
    }
}

impl PropsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: PropsConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// Get a setting by name, formatted for display.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "defaults_key" => Some(self.defaults_key.clone()),
            "cache_by_default" => Some(self.cache_by_default.to_string()),
            "key_collision" => Some(self.key_collision.to_string()),
            "key_field" => Some(self.key_field.clone()),
            _ => None,
        }
    }

    /// Set a setting by name from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults_key" => self.defaults_key = non_empty(key, value)?,
            "cache_by_default" => {
                self.cache_by_default = value.parse().map_err(|_| {
                    PropsError::Config(format!("{} must be true or false, got '{}'", key, value))
                })?
            }
            "key_collision" => self.key_collision = value.parse()?,
            "key_field" => self.key_field = non_empty(key, value)?,
            _ => return Err(PropsError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(PropsError::Config(format!("{} cannot be empty", key)));
    }
    Ok(value.to_string())
}
