use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{key}` holds an unexpected value: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Interface for abstracting persisted engine state. Values are plain JSON documents addressed by
/// keys such as `categoryList` or `usage:2026-10-18`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns `None` for keys that were never written.
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn write(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
