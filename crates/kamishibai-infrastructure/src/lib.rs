//! Storage backends for kamishibai.
//!
//! Implements the core's `SessionStore` and `FeedbackStore` traits over JSON
//! files and over process memory.

mod json_feedback_store;
mod json_session_store;
mod json_storage;
mod memory_store;
mod paths;

pub use json_feedback_store::JsonFeedbackStore;
pub use json_session_store::JsonSessionStore;
pub use json_storage::JsonDirStorage;
pub use memory_store::{MemoryFeedbackStore, MemorySessionStore};
pub use paths::KamishibaiPaths;
