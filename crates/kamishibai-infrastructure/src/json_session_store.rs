//! JSON-file-backed SessionStore implementation.

use std::path::Path;

use async_trait::async_trait;
use kamishibai_core::Result;
use kamishibai_core::session::{EditSession, SessionStore};

use crate::json_storage::JsonDirStorage;
use crate::paths::KamishibaiPaths;

const NAMESPACE: &str = "sessions";

/// Persists edit sessions as one JSON file per presentation id.
pub struct JsonSessionStore {
    storage: JsonDirStorage,
}

impl JsonSessionStore {
    /// Creates a store rooted at `base_dir`.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            storage: JsonDirStorage::new(base_dir).await?,
        })
    }

    /// Creates a store at the default location (`<config dir>/kamishibai`).
    pub async fn default_location() -> Result<Self> {
        Self::new(KamishibaiPaths::config_dir()?).await
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn get(&self, key: &str) -> Result<Option<EditSession>> {
        self.storage.load(NAMESPACE, key).await
    }

    async fn put(&self, key: &str, session: &EditSession) -> Result<()> {
        self.storage.save(NAMESPACE, key, session).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage.delete(NAMESPACE, key).await
    }
}
