//! Kamishibai core: slide-deck normalization and edit-history management.
//!
//! The pipeline: raw provider text → [`deck::normalize`] → [`deck::Deck`] →
//! [`session::EditSessionManager`] (snapshots, undo/redo) → finalize →
//! export renderer. Generation providers, the session store and the export
//! renderer are boundary traits implemented elsewhere.

pub mod deck;
pub mod error;
pub mod export;
pub mod feedback;
pub mod provider;
pub mod session;

// Re-export common error type
pub use error::{DeckError, Result};
