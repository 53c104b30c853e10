//! Edit session lifecycle management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::EditSession;
use super::store::SessionStore;
use crate::deck::{Deck, Slide};
use crate::error::{DeckError, Result};

/// A shallow field patch applied to one slide.
///
/// Patch fields win over the slide's existing fields, mirroring a spread
/// merge. A patch may even rewrite the `type` tag; the merged object must
/// still deserialize into a valid slide, otherwise the patch is rejected as
/// invalid input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlidePatch(pub Map<String, Value>);

impl SlidePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field on the patch.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builds a patch from a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DeckError::invalid_input(format!(
                "slide patch must be a JSON object, got {other}"
            ))),
        }
    }

    /// Merges this patch onto `slide`, producing a new slide value.
    pub fn apply(&self, slide: &Slide) -> Result<Slide> {
        let mut merged = serde_json::to_value(slide)?;
        let obj = merged
            .as_object_mut()
            .ok_or_else(|| DeckError::internal("slide did not serialize to an object"))?;

        for (key, value) in &self.0 {
            obj.insert(key.clone(), value.clone());
        }

        serde_json::from_value(merged)
            .map_err(|e| DeckError::invalid_input(format!("patch produced an invalid slide: {e}")))
    }
}

/// Manages per-document edit sessions and their linear undo/redo history.
///
/// `EditSessionManager` is responsible for:
/// - Starting sessions from a normalized deck
/// - Applying mutation operations (update/add/remove/reorder), each of which
///   produces a new snapshot under the truncate-then-append discipline
/// - Moving the history cursor (undo/redo/reset)
/// - Finalizing and clearing sessions
///
/// Every mutating operation is a read-modify-write over the full session
/// record in the store and leaves the stored record untouched when it fails.
/// The manager is designed for one active editor per session id; concurrent
/// calls against the same id need an external mutual-exclusion layer, since
/// the read-modify-write cycle is not atomic against interleaved writers.
pub struct EditSessionManager {
    store: Arc<dyn SessionStore>,
}

impl EditSessionManager {
    /// Creates a new manager over the given store backend.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    async fn load(&self, session_id: &str) -> Result<EditSession> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| DeckError::not_found("edit session", session_id))
    }

    async fn persist(&self, session_id: &str, session: &EditSession) -> Result<()> {
        self.store.put(session_id, session).await
    }

    /// Starts a new edit session from a deck.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the deck has no slides.
    pub async fn start(&self, session_id: &str, deck: &Deck) -> Result<EditSession> {
        if deck.slides.is_empty() {
            return Err(DeckError::invalid_input(
                "cannot start editing a deck with no slides",
            ));
        }

        let session = EditSession::new(&deck.slides);
        self.persist(session_id, &session).await?;
        Ok(session)
    }

    /// Merges `patch` onto the slide at `index` and commits a new snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound` when no session exists, `IndexOutOfRange` when `index` is
    /// outside the current slide sequence.
    pub async fn update(
        &self,
        session_id: &str,
        index: usize,
        patch: &SlidePatch,
    ) -> Result<EditSession> {
        let mut session = self.load(session_id).await?;
        let len = session.current_slides.len();
        let slide = session
            .current_slides
            .get(index)
            .ok_or_else(|| DeckError::index_out_of_range(index, len))?;

        let updated = patch.apply(slide)?;
        let mut slides = session.current_slides.clone();
        slides[index] = updated;
        session.commit(slides);

        self.persist(session_id, &session).await?;
        Ok(session)
    }

    /// Inserts `slide` before `position`, or appends when `position` is
    /// omitted or past the end.
    pub async fn add(
        &self,
        session_id: &str,
        slide: Slide,
        position: Option<usize>,
    ) -> Result<EditSession> {
        let mut session = self.load(session_id).await?;
        let mut slides = session.current_slides.clone();

        match position {
            Some(position) if position < slides.len() => slides.insert(position, slide),
            _ => slides.push(slide),
        }
        session.commit(slides);

        self.persist(session_id, &session).await?;
        Ok(session)
    }

    /// Removes the slide at `index`.
    ///
    /// Returns `Ok(None)` without touching the session when only one slide
    /// remains: a deck must never reach zero slides through editing.
    pub async fn remove(&self, session_id: &str, index: usize) -> Result<Option<EditSession>> {
        let mut session = self.load(session_id).await?;
        let len = session.current_slides.len();

        if len <= 1 {
            return Ok(None);
        }
        if index >= len {
            return Err(DeckError::index_out_of_range(index, len));
        }

        let mut slides = session.current_slides.clone();
        slides.remove(index);
        session.commit(slides);

        self.persist(session_id, &session).await?;
        Ok(Some(session))
    }

    /// Moves the slide at `from` so it lands at `to` in the resulting
    /// sequence (splice semantics: `to` is interpreted against the sequence
    /// after removal; past-the-end values append).
    pub async fn reorder(&self, session_id: &str, from: usize, to: usize) -> Result<EditSession> {
        let mut session = self.load(session_id).await?;
        let len = session.current_slides.len();
        if from >= len {
            return Err(DeckError::index_out_of_range(from, len));
        }

        let mut slides = session.current_slides.clone();
        let moved = slides.remove(from);
        let to = to.min(slides.len());
        slides.insert(to, moved);
        session.commit(slides);

        self.persist(session_id, &session).await?;
        Ok(session)
    }

    /// Steps the cursor back one snapshot. `Ok(None)` at the start of
    /// history; the history itself is preserved for redo.
    pub async fn undo(&self, session_id: &str) -> Result<Option<EditSession>> {
        let mut session = self.load(session_id).await?;
        if session.cursor == 0 {
            return Ok(None);
        }

        session.move_cursor(session.cursor - 1);
        self.persist(session_id, &session).await?;
        Ok(Some(session))
    }

    /// Steps the cursor forward one snapshot. `Ok(None)` at the end.
    pub async fn redo(&self, session_id: &str) -> Result<Option<EditSession>> {
        let mut session = self.load(session_id).await?;
        if session.cursor + 1 >= session.history.len() {
            return Ok(None);
        }

        session.move_cursor(session.cursor + 1);
        self.persist(session_id, &session).await?;
        Ok(Some(session))
    }

    /// Returns to the original slides captured at session start.
    ///
    /// Unlike the other mutators, reset appends the original snapshot
    /// without truncating the redo branch first: the full prior history is
    /// kept and the original state becomes a new terminal entry.
    pub async fn reset(&self, session_id: &str) -> Result<EditSession> {
        let mut session = self.load(session_id).await?;

        let original = session.original_slides.clone();
        session.history.push(original.clone());
        session.cursor = session.history.len() - 1;
        session.current_slides = original;

        self.persist(session_id, &session).await?;
        Ok(session)
    }

    /// Returns the current slides as a deck-shaped document without
    /// mutating session state. Deck metadata stays with the caller.
    pub async fn finalize(&self, session_id: &str) -> Result<Deck> {
        let session = self.load(session_id).await?;
        Ok(Deck::from_slides(session.current_slides))
    }

    /// Deletes the session from the store. Absent sessions are fine.
    pub async fn clear(&self, session_id: &str) -> Result<()> {
        self.store.delete(session_id).await
    }
}
