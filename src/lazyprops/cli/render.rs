use lazyprops::collection::KeyedCollection;
use lazyprops::config::{PropsConfig, CONFIG_KEYS};
use lazyprops::error::Result;
use lazyprops::model::ConfigModel;

/// Pretty JSON for a merged collection, in collection order.
pub fn render_collection(collection: &KeyedCollection<ConfigModel>) -> Result<String> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// One `key = value` line per setting.
pub fn render_config(config: &PropsConfig) -> String {
    let mut output = String::new();
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            output.push_str(&format!("{} = {}\n", key, value));
        }
    }
    output
}
