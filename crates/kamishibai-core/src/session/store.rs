//! Session store trait.
//!
//! Defines the interface for edit-session persistence.

use super::model::EditSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract key-value store for edit sessions, keyed by presentation id.
///
/// This decouples the edit-history logic from the storage mechanism (browser
/// local storage in the original deployment, JSON files or an in-memory map
/// here). Implementations should treat a missing key as `Ok(None)`, not an
/// error, and `delete` of an absent key as a no-op.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the session stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<EditSession>>;

    /// Stores `session` under `key`, replacing any previous value.
    async fn put(&self, key: &str, session: &EditSession) -> Result<()>;

    /// Removes the session stored under `key`. Absent keys are fine.
    async fn delete(&self, key: &str) -> Result<()>;
}
