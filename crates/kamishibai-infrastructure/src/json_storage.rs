//! Generic JSON directory storage.
//!
//! Persists serializable values as pretty-printed JSON files, one file per
//! id, grouped by namespace:
//!
//! ```text
//! base_dir/
//! ├── sessions/
//! │   ├── presentation-1.json
//! │   └── presentation-2.json
//! └── feedback/
//!     └── presentation-1.json
//! ```

use std::path::{Path, PathBuf};

use kamishibai_core::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

/// Async JSON file storage under a base directory.
pub struct JsonDirStorage {
    base_dir: PathBuf,
}

impl JsonDirStorage {
    /// Creates the storage, ensuring the base directory exists.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    /// Serializes `value` to `<base>/<namespace>/<id>.json`.
    pub async fn save<T: Serialize>(&self, namespace: &str, id: &str, value: &T) -> Result<()> {
        let dir = self.base_dir.join(namespace);
        fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(value)?;
        let path = self.entry_path(namespace, id);
        fs::write(&path, json).await?;
        tracing::debug!("saved {} entry '{}'", namespace, id);

        Ok(())
    }

    /// Loads and deserializes the entry, or `None` when the file is absent.
    pub async fn load<T: DeserializeOwned>(&self, namespace: &str, id: &str) -> Result<Option<T>> {
        let path = self.entry_path(namespace, id);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).await?;
        let value = serde_json::from_str(&json)?;
        Ok(Some(value))
    }

    /// Removes the entry. Absent entries are a no-op.
    pub async fn delete(&self, namespace: &str, id: &str) -> Result<()> {
        let path = self.entry_path(namespace, id);
        if fs::try_exists(&path).await? {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    fn entry_path(&self, namespace: &str, id: &str) -> PathBuf {
        self.base_dir.join(namespace).join(format!("{id}.json"))
    }
}
