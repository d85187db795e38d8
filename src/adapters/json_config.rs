//! JSON configuration adapter.
//!
//! Implements [`ConfigPort`] over a sectioned JSON document:
//!
//! ```json
//! { "Gpio": { "enable": true, "lamp_pin": 4, "flash_pin": 18 } }
//! ```
//!
//! Keys missing from the document fall back to the built-in defaults of
//! [`GpioConfig`], so a config file only needs the keys it changes.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::{GpioConfig, SECTION};

pub struct JsonConfig {
    doc: Value,
    defaults: Value,
}

impl JsonConfig {
    /// Document with no overrides: every key resolves to its default.
    pub fn empty() -> Self {
        Self::from_value(Value::Object(serde_json::Map::new()))
    }

    pub fn from_value(doc: Value) -> Self {
        let mut defaults = serde_json::Map::new();
        // Serialising the defaults cannot fail: plain struct of bool and u8.
        if let Ok(gpio) = serde_json::to_value(GpioConfig::default()) {
            defaults.insert(SECTION.to_owned(), gpio);
        }
        Self {
            doc,
            defaults: Value::Object(defaults),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_json::from_str(text).map_err(|e| {
            warn!("config: parse error: {}", e);
            ConfigError::Corrupted
        })?;
        if !doc.is_object() {
            warn!("config: top level is not an object");
            return Err(ConfigError::Corrupted);
        }
        Ok(Self::from_value(doc))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            warn!("config: cannot read {}: {}", path.display(), e);
            ConfigError::IoError
        })?;
        let config = Self::parse(&text)?;
        info!("config: loaded {}", path.display());
        Ok(config)
    }

    fn lookup(&self, section: &str, key: &str) -> Result<&Value, ConfigError> {
        self.doc
            .get(section)
            .and_then(|s| s.get(key))
            .or_else(|| self.defaults.get(section).and_then(|s| s.get(key)))
            .ok_or(ConfigError::Missing)
    }
}

impl ConfigPort for JsonConfig {
    fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        self.lookup(section, key)?
            .as_bool()
            .ok_or(ConfigError::WrongType)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError> {
        self.lookup(section, key)?
            .as_i64()
            .ok_or(ConfigError::WrongType)
    }
}
