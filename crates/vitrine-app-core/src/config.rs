// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON config service over a pluggable blob store.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw config blobs, keyed by logical name (`"viewer"`, ...).
pub trait ConfigStore {
    /// Load a raw blob. Returns [`ConfigError::NotFound`] when the key was never saved.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw blob, replacing any previous value.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in the store.
    #[error("config key not found")]
    NotFound,
    /// I/O failure while reading or writing.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored bytes are not valid JSON for the requested type.
    #[error("config serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store-specific failure (e.g. no config directory on this platform).
    #[error("config store unavailable: {0}")]
    Unavailable(String),
}

/// Serializes values as pretty JSON and delegates bytes to a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Load and deserialize `key`. Missing or empty blobs yield `Ok(None)`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Load `key`, falling back to `T::default()` on any failure.
    ///
    /// Corrupt blobs are logged and ignored so a bad file never blocks startup.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                tracing::warn!(key, %err, "ignoring unreadable config");
                T::default()
            }
        }
    }

    /// Serialize and persist `value` under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}
