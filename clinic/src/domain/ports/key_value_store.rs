//! Port for the durable string-keyed store backing session persistence.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// The key cannot be mapped onto the adapter's storage layout.
        InvalidKey { key: String } => "storage key is not usable: {key}",
        /// Reading or writing the underlying medium failed.
        Io { message: String } => "storage I/O failed: {message}",
    }
}

/// Port for small string values persisted across restarts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Delete `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
