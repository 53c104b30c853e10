//! Per-slide feedback.
//!
//! Lightweight ratings and comments attached to individual slides of a
//! presentation, persisted through the same key-value abstraction as edit
//! sessions but under their own key namespace.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};

/// One piece of feedback for one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub slide_index: usize,
    /// 1 to 5 inclusive.
    pub rating: u8,
    pub comment: String,
    /// RFC 3339 timestamp assigned when the entry is recorded.
    pub timestamp: String,
}

/// Key-value persistence for feedback lists, keyed by presentation id.
///
/// A missing key reads as an empty list.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<FeedbackEntry>>;
    async fn put(&self, key: &str, entries: &[FeedbackEntry]) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Records and aggregates per-slide feedback for presentations.
pub struct FeedbackManager {
    store: Arc<dyn FeedbackStore>,
}

impl FeedbackManager {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    /// Appends a feedback entry, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `rating` is outside `1..=5`.
    pub async fn record(
        &self,
        presentation_id: &str,
        slide_index: usize,
        rating: u8,
        comment: impl Into<String>,
    ) -> Result<FeedbackEntry> {
        if !(1..=5).contains(&rating) {
            return Err(DeckError::invalid_input(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }

        let entry = FeedbackEntry {
            slide_index,
            rating,
            comment: comment.into(),
            timestamp: Utc::now().to_rfc3339(),
        };

        let mut entries = self.store.get(presentation_id).await?;
        entries.push(entry.clone());
        self.store.put(presentation_id, &entries).await?;

        Ok(entry)
    }

    /// All feedback for a presentation, in recording order.
    pub async fn list(&self, presentation_id: &str) -> Result<Vec<FeedbackEntry>> {
        self.store.get(presentation_id).await
    }

    /// Feedback filtered to one slide.
    pub async fn for_slide(
        &self,
        presentation_id: &str,
        slide_index: usize,
    ) -> Result<Vec<FeedbackEntry>> {
        let entries = self.store.get(presentation_id).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.slide_index == slide_index)
            .collect())
    }

    /// Average rating, for the whole presentation or one slide.
    /// No feedback yields 0.0.
    pub async fn average_rating(
        &self,
        presentation_id: &str,
        slide_index: Option<usize>,
    ) -> Result<f64> {
        let entries = match slide_index {
            Some(index) => self.for_slide(presentation_id, index).await?,
            None => self.list(presentation_id).await?,
        };

        if entries.is_empty() {
            return Ok(0.0);
        }

        let sum: u32 = entries.iter().map(|entry| u32::from(entry.rating)).sum();
        Ok(f64::from(sum) / entries.len() as f64)
    }

    /// Removes the entry at `entry_index`. Returns `false` without touching
    /// the stored list when the index is out of range.
    pub async fn remove(&self, presentation_id: &str, entry_index: usize) -> Result<bool> {
        let mut entries = self.store.get(presentation_id).await?;
        if entry_index >= entries.len() {
            return Ok(false);
        }

        entries.remove(entry_index);
        self.store.put(presentation_id, &entries).await?;
        Ok(true)
    }

    /// Drops all feedback for a presentation.
    pub async fn clear(&self, presentation_id: &str) -> Result<()> {
        self.store.delete(presentation_id).await
    }
}
