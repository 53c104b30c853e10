//! Path management for kamishibai data files.

use std::path::PathBuf;

use kamishibai_core::{DeckError, Result};

/// Resolves the on-disk locations used by the file-backed stores.
///
/// # Directory Structure
///
/// ```text
/// <config dir>/kamishibai/
/// ├── sessions/          # Edit session files (one JSON file per id)
/// └── feedback/          # Feedback files (one JSON file per id)
/// ```
pub struct KamishibaiPaths;

impl KamishibaiPaths {
    /// Returns the kamishibai configuration directory
    /// (`~/.config/kamishibai` on Linux).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("kamishibai"))
            .ok_or_else(|| DeckError::io("cannot determine config directory"))
    }
}
