//! JSON section store.
//!
//! Implements [`ConfigPort`] over a JSON document whose top-level keys are
//! section names:
//!
//! ```json
//! {
//!   "DeepSleepDataProvider": { "sleep_time_secs": 900 },
//!   "DeepSleepWakePin":      { "wake_gpio_pin": 27 },
//!   "Network":               { "ssid": "field-ap", "password": "..." }
//! }
//! ```
//!
//! Sections are kept as raw JSON bytes (the same shape an NVS blob would
//! have) and deserialised on request.

use std::collections::HashMap;

use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::app::ports::{ConfigError, ConfigPort};

#[derive(Debug, Default)]
pub struct ConfigStore {
    sections: HashMap<String, Vec<u8>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole document.  Every top-level key becomes a section.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(doc).map_err(|_| ConfigError::InvalidDocument)?;
        let serde_json::Value::Object(map) = value else {
            return Err(ConfigError::InvalidDocument);
        };

        let mut store = Self::new();
        for (name, section) in map {
            let bytes = serde_json::to_vec(&section).map_err(|_| ConfigError::InvalidDocument)?;
            store.sections.insert(name, bytes);
        }
        info!("ConfigStore: {} sections loaded", store.sections.len());
        Ok(store)
    }

    /// Insert or replace a section from a typed record.
    pub fn set_section<T: Serialize>(&mut self, name: &'static str, value: &T) -> Result<(), ConfigError> {
        let bytes = serde_json::to_vec(value).map_err(|_| ConfigError::Malformed(name))?;
        self.sections.insert(name.to_owned(), bytes);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }
}

impl ConfigPort for ConfigStore {
    fn section<T: DeserializeOwned>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        let Some(bytes) = self.sections.get(name) else {
            return Ok(None);
        };
        serde_json::from_slice(bytes).map(Some).map_err(|e| {
            warn!("ConfigStore: section '{}' rejected: {}", name, e);
            ConfigError::Malformed(name)
        })
    }
}
