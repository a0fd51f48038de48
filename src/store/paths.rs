//! Layout of the on-disk data directory.

use crate::store::fs::StoreError;
use std::path::{Path, PathBuf};

/// Resolved locations of everything under the data directory.
///
/// ```text
/// <root>/
///   notes/<id>.json            one file per note
///   tags/tags.json             tag registry
///   reminders/reminders.json   reminder list
///   templates/templates.json   note templates
///   stats/usage_data.json      usage counters
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    root: PathBuf,
}

impl DataDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The platform data directory for this application, e.g.
    /// `~/.local/share/nook` on Linux.
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("nook"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.root.join("notes")
    }

    pub fn tags_file(&self) -> PathBuf {
        self.root.join("tags").join("tags.json")
    }

    pub fn reminders_file(&self) -> PathBuf {
        self.root.join("reminders").join("reminders.json")
    }

    pub fn templates_file(&self) -> PathBuf {
        self.root.join("templates").join("templates.json")
    }

    pub fn stats_file(&self) -> PathBuf {
        self.root.join("stats").join("usage_data.json")
    }

    /// Creates the directory skeleton if it doesn't exist yet.
    pub fn ensure(&self) -> Result<(), StoreError> {
        let notes = self.notes_dir();
        std::fs::create_dir_all(&notes).map_err(|e| StoreError::from_io(&notes, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn paths_hang_off_root() {
        let dirs = DataDirs::new("/data/nook");
        assert_eq!(dirs.notes_dir(), PathBuf::from("/data/nook/notes"));
        assert_eq!(dirs.tags_file(), PathBuf::from("/data/nook/tags/tags.json"));
        assert_eq!(
            dirs.reminders_file(),
            PathBuf::from("/data/nook/reminders/reminders.json")
        );
        assert_eq!(
            dirs.templates_file(),
            PathBuf::from("/data/nook/templates/templates.json")
        );
        assert_eq!(
            dirs.stats_file(),
            PathBuf::from("/data/nook/stats/usage_data.json")
        );
    }

    #[test]
    fn ensure_creates_notes_dir() {
        let tmp = TempDir::new().unwrap();
        let dirs = DataDirs::new(tmp.path().join("store"));
        dirs.ensure().unwrap();
        assert!(dirs.notes_dir().is_dir());
    }

    #[test]
    fn ensure_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dirs = DataDirs::new(tmp.path().join("store"));
        dirs.ensure().unwrap();
        dirs.ensure().unwrap();
        assert!(dirs.notes_dir().is_dir());
    }
}
