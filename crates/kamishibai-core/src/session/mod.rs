//! Edit session domain module.
//!
//! - `model`: the per-document editing state (`EditSession`)
//! - `store`: persistence trait for sessions (`SessionStore`)
//! - `manager`: edit operations, undo/redo and lifecycle
//!   (`EditSessionManager`)

mod manager;
mod model;
mod store;

pub use manager::{EditSessionManager, SlidePatch};
pub use model::{DEFAULT_SESSION_KEY, EditSession};
pub use store::SessionStore;
