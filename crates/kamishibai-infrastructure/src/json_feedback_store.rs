//! JSON-file-backed FeedbackStore implementation.

use std::path::Path;

use async_trait::async_trait;
use kamishibai_core::Result;
use kamishibai_core::feedback::{FeedbackEntry, FeedbackStore};

use crate::json_storage::JsonDirStorage;
use crate::paths::KamishibaiPaths;

const NAMESPACE: &str = "feedback";

/// Persists per-presentation feedback lists as JSON files.
pub struct JsonFeedbackStore {
    storage: JsonDirStorage,
}

impl JsonFeedbackStore {
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            storage: JsonDirStorage::new(base_dir).await?,
        })
    }

    pub async fn default_location() -> Result<Self> {
        Self::new(KamishibaiPaths::config_dir()?).await
    }
}

#[async_trait]
impl FeedbackStore for JsonFeedbackStore {
    async fn get(&self, key: &str) -> Result<Vec<FeedbackEntry>> {
        Ok(self.storage.load(NAMESPACE, key).await?.unwrap_or_default())
    }

    async fn put(&self, key: &str, entries: &[FeedbackEntry]) -> Result<()> {
        self.storage.save(NAMESPACE, key, &entries).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage.delete(NAMESPACE, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_absent_key_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFeedbackStore::new(temp_dir.path()).await.unwrap();

        assert!(store.get("p1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFeedbackStore::new(temp_dir.path()).await.unwrap();

        let entries = vec![FeedbackEntry {
            slide_index: 0,
            rating: 4,
            comment: "わかりやすい".to_string(),
            timestamp: "2026-01-02T03:04:05Z".to_string(),
        }];
        store.put("p1", &entries).await.unwrap();
        assert_eq!(store.get("p1").await.unwrap(), entries);

        store.delete("p1").await.unwrap();
        assert!(store.get("p1").await.unwrap().is_empty());
    }
}
