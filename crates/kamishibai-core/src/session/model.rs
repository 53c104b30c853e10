//! Edit session domain model.

use serde::{Deserialize, Serialize};

use crate::deck::Slide;

/// Default store key for single-session "current presentation" use.
pub const DEFAULT_SESSION_KEY: &str = "current";

/// Per-document editing state: a linear history of slide-sequence snapshots
/// with a cursor.
///
/// `history[0]` is the initial state; `cursor` always satisfies
/// `0 <= cursor < history.len()`. `current_slides` is a materialized copy of
/// `history[cursor]` kept for convenience. Snapshots are owned values and
/// never alias each other: mutating one can never retroactively alter an
/// earlier history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    /// Deep snapshot captured at session start; only `reset` returns to it.
    pub original_slides: Vec<Slide>,
    /// Materialized view equal to `history[cursor]`.
    pub current_slides: Vec<Slide>,
    /// Append-only snapshot sequence (truncated by new edits after undo).
    pub history: Vec<Vec<Slide>>,
    /// Index of the active snapshot.
    pub cursor: usize,
}

impl EditSession {
    /// Creates a fresh session whose history holds one initial snapshot.
    pub fn new(slides: &[Slide]) -> Self {
        Self {
            original_slides: slides.to_vec(),
            current_slides: slides.to_vec(),
            history: vec![slides.to_vec()],
            cursor: 0,
        }
    }

    /// Discards the redo branch and appends `slides` as the new active
    /// snapshot. This is the shared history discipline of every mutating
    /// edit operation.
    pub fn commit(&mut self, slides: Vec<Slide>) {
        self.history.truncate(self.cursor + 1);
        self.history.push(slides.clone());
        self.cursor = self.history.len() - 1;
        self.current_slides = slides;
    }

    /// Moves the cursor without touching history. The caller guarantees the
    /// index is in range.
    pub(crate) fn move_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.current_slides = self.history[cursor].clone();
    }
}
