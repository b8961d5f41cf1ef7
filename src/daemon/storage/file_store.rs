use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fs::operations::{read_locked, write_locked};

use super::key_value::{KeyValueStore, StoreError};

/// The main realization of [KeyValueStore]. Every key is a separate json file, `:` in keys
/// becomes a directory separator so that daily usage ends up in `usage/<day>.json`.
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    pub fn new(state_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&state_dir)?;

        Ok(Self { state_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut path = self.state_dir.clone();
        for segment in key.split(':') {
            path.push(segment);
        }
        path.set_extension("json");
        path
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        debug!("Reading {path:?}");
        let bytes = read_locked(&path).await.map_err(|source| StoreError::Io {
            key: key.to_owned(),
            source,
        })?;
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                // The document is left untouched so it can be repaired by hand.
                warn!("Found illegal json in {path:?}: {source}");
                Err(StoreError::Decode {
                    key: key.to_owned(),
                    source,
                })
            }
        }
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec(&value).map_err(|source| StoreError::Encode {
            key: key.to_owned(),
            source,
        })?;
        debug!("Writing {path:?}");
        write_locked(&path, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                key: key.to_owned(),
                source,
            })
    }
}
