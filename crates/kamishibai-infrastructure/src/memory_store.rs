//! In-memory store implementations.
//!
//! Everything lives for the process lifetime only. Useful for tests and for
//! single-shot runs that do not need durable sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use kamishibai_core::Result;
use kamishibai_core::feedback::{FeedbackEntry, FeedbackStore};
use kamishibai_core::session::{EditSession, SessionStore};
use tokio::sync::RwLock;

/// Process-local session store.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, EditSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<EditSession>> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, session: &EditSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(key.to_string(), session.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.sessions.write().await.remove(key);
        Ok(())
    }
}

/// Process-local feedback store.
#[derive(Default)]
pub struct MemoryFeedbackStore {
    entries: RwLock<HashMap<String, Vec<FeedbackEntry>>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn get(&self, key: &str) -> Result<Vec<FeedbackEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn put(&self, key: &str, entries: &[FeedbackEntry]) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), entries.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
