//! Tag registry: tags.json plus cascading updates into notes.

use crate::domain::{Note, NoteId, TagInfo, TagName};
use crate::store::fs::{StoreError, read_json, write_json_atomic};
use crate::store::notes::NoteStore;
use crate::store::stats::{StatEvent, StatsTracker};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The authoritative map of known tags.
///
/// Tag names are exact, case-sensitive keys. Rename and delete cascade into
/// every note carrying the tag: the notes are rewritten first, then the
/// registry file, so a crash in between leaves retagged notes and a stale
/// registry rather than notes pointing at a tag that no longer exists.
pub struct TagRegistry {
    path: PathBuf,
    tags: BTreeMap<String, TagInfo>,
    stats: StatsTracker,
}

fn default_tags() -> BTreeMap<String, TagInfo> {
    [
        ("important", TagInfo::new("#FF5733", "star.png")),
        ("personal", TagInfo::new("#33A8FF", "user.png")),
        ("work", TagInfo::new("#33FF57", "briefcase.png")),
        ("idea", TagInfo::new("#FFD700", "lightbulb.png")),
        ("pending", TagInfo::new("#8A2BE2", "clock.png")),
    ]
    .into_iter()
    .map(|(name, info)| (name.to_string(), info))
    .collect()
}

impl TagRegistry {
    /// Loads tags.json. A missing file is seeded with the default tag set
    /// and persisted; a corrupt file is logged and replaced by an empty
    /// registry so existing user tags are never silently resurrected.
    pub fn open(path: impl Into<PathBuf>, stats: StatsTracker) -> Result<Self, StoreError> {
        let path = path.into();
        let tags = match read_json::<BTreeMap<String, TagInfo>>(&path) {
            Ok(tags) => tags,
            Err(StoreError::NotFound { .. }) => {
                let defaults = default_tags();
                write_json_atomic(&path, &defaults)?;
                defaults
            }
            Err(err) => {
                log::warn!("starting with empty tag registry: {err}");
                BTreeMap::new()
            }
        };
        Ok(Self { path, tags, stats })
    }

    fn persist(&self) -> Result<(), StoreError> {
        write_json_atomic(&self.path, &self.tags)
    }

    /// All tags with their display metadata, sorted by name.
    pub fn all(&self) -> &BTreeMap<String, TagInfo> {
        &self.tags
    }

    pub fn get(&self, name: &str) -> Option<&TagInfo> {
        self.tags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Registers a new tag. Returns false if the name is already taken.
    pub fn create(&mut self, name: &TagName, info: TagInfo) -> Result<bool, StoreError> {
        if self.tags.contains_key(name.as_str()) {
            return Ok(false);
        }
        self.tags.insert(name.as_str().to_string(), info);
        self.persist()?;
        self.stats.record(StatEvent::TagCreated);
        Ok(true)
    }

    /// Updates the display metadata of an existing tag. Returns false if
    /// the tag doesn't exist.
    pub fn set_info(&mut self, name: &str, info: TagInfo) -> Result<bool, StoreError> {
        let Some(slot) = self.tags.get_mut(name) else {
            return Ok(false);
        };
        *slot = info;
        self.persist()?;
        Ok(true)
    }

    /// Renames a tag, rewriting every note that carries it.
    ///
    /// Returns false when `old` doesn't exist or `new` is already taken.
    /// Renaming a tag to itself is a no-op that succeeds.
    pub fn rename(
        &mut self,
        old: &str,
        new: &TagName,
        notes: &mut NoteStore,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        if !self.tags.contains_key(old) {
            return Ok(false);
        }
        if new.as_str() == old {
            return Ok(true);
        }
        if self.tags.contains_key(new.as_str()) {
            return Ok(false);
        }

        let affected: Vec<NoteId> = notes
            .list_all()
            .iter()
            .filter(|note| note.tags().contains(old))
            .map(|note| note.id().clone())
            .collect();
        for id in &affected {
            if let Some(note) = notes.get(id) {
                let mut tags = note.tags().clone();
                tags.remove(old);
                tags.insert(new.as_str().to_string());
                notes.set_note_tags(id, tags, now)?;
            }
        }

        if let Some(info) = self.tags.remove(old) {
            self.tags.insert(new.as_str().to_string(), info);
        }
        self.persist()?;
        Ok(true)
    }

    /// Deletes a tag, stripping it from every note that carries it.
    /// Returns false if the tag doesn't exist.
    pub fn delete(
        &mut self,
        name: &str,
        notes: &mut NoteStore,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        if !self.tags.contains_key(name) {
            return Ok(false);
        }

        let affected: Vec<NoteId> = notes
            .list_all()
            .iter()
            .filter(|note| note.tags().contains(name))
            .map(|note| note.id().clone())
            .collect();
        for id in &affected {
            if let Some(note) = notes.get(id) {
                let mut tags = note.tags().clone();
                tags.remove(name);
                notes.set_note_tags(id, tags, now)?;
            }
        }

        self.tags.remove(name);
        self.persist()?;
        self.stats.record(StatEvent::TagDeleted);
        Ok(true)
    }

    /// Attaches a registered tag to a note. Returns false when the tag is
    /// unknown or the note doesn't exist; attaching a tag the note already
    /// carries is a no-op that succeeds.
    pub fn add_to_note(
        &self,
        name: &str,
        id: &NoteId,
        notes: &mut NoteStore,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        if !self.tags.contains_key(name) {
            return Ok(false);
        }
        let Some(note) = notes.get(id) else {
            return Ok(false);
        };
        if note.tags().contains(name) {
            return Ok(true);
        }
        let mut tags = note.tags().clone();
        tags.insert(name.to_string());
        notes.set_note_tags(id, tags, now)
    }

    /// Detaches a tag from a note. Returns false when the note doesn't
    /// exist; removing a tag the note doesn't carry is a no-op that
    /// succeeds.
    pub fn remove_from_note(
        &self,
        name: &str,
        id: &NoteId,
        notes: &mut NoteStore,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        let Some(note) = notes.get(id) else {
            return Ok(false);
        };
        if !note.tags().contains(name) {
            return Ok(true);
        }
        let mut tags = note.tags().clone();
        tags.remove(name);
        notes.set_note_tags(id, tags, now)
    }

    /// All notes carrying the given tag, most recently updated first.
    pub fn notes_with_tag<'a>(&self, name: &str, notes: &'a NoteStore) -> Vec<&'a Note> {
        notes
            .list_all()
            .into_iter()
            .filter(|note| note.tags().contains(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoteContent, NoteKind, parse_datetime};
    use crate::store::paths::DataDirs;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup(tmp: &TempDir) -> (DataDirs, NoteStore, TagRegistry) {
        let dirs = DataDirs::new(tmp.path().join("data"));
        let stats = StatsTracker::open(dirs.stats_file());
        let notes = NoteStore::open(&dirs, stats.clone()).unwrap();
        let tags = TagRegistry::open(dirs.tags_file(), stats).unwrap();
        (dirs, notes, tags)
    }

    fn now() -> NaiveDateTime {
        parse_datetime("2024-03-01T12:00:00").unwrap()
    }

    fn tag(name: &str) -> TagName {
        name.parse().unwrap()
    }

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let (dirs, _notes, registry) = setup(&tmp);

        assert_eq!(registry.all().len(), 5);
        assert!(registry.contains("important"));
        assert_eq!(registry.get("important").unwrap().color, "#FF5733");
        assert!(dirs.tags_file().exists());
    }

    #[test]
    fn corrupt_file_starts_empty_without_defaults() {
        let tmp = TempDir::new().unwrap();
        let dirs = DataDirs::new(tmp.path().join("data"));
        dirs.ensure().unwrap();
        fs::create_dir_all(dirs.tags_file().parent().unwrap()).unwrap();
        fs::write(dirs.tags_file(), "{broken").unwrap();

        let stats = StatsTracker::open(dirs.stats_file());
        let registry = TagRegistry::open(dirs.tags_file(), stats).unwrap();
        assert!(registry.all().is_empty());
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, _notes, mut registry) = setup(&tmp);

        assert!(registry.create(&tag("travel"), TagInfo::default()).unwrap());
        assert!(!registry.create(&tag("travel"), TagInfo::default()).unwrap());
    }

    #[test]
    fn names_are_case_sensitive_keys() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, _notes, mut registry) = setup(&tmp);

        assert!(registry.create(&tag("Work"), TagInfo::default()).unwrap());
        assert!(registry.contains("Work"));
        assert!(registry.contains("work")); // seeded default
        assert_ne!(
            registry.get("Work").unwrap().color,
            registry.get("work").unwrap().color
        );
    }

    #[test]
    fn rename_cascades_into_notes() {
        let tmp = TempDir::new().unwrap();
        let (dirs, mut notes, mut registry) = setup(&tmp);

        let id = notes
            .create("Tagged", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        registry
            .add_to_note("work", &id, &mut notes, now())
            .unwrap();

        assert!(registry
            .rename("work", &tag("job"), &mut notes, now())
            .unwrap());
        assert!(!registry.contains("work"));
        assert!(registry.contains("job"));

        let note = notes.get(&id).unwrap();
        assert!(note.tags().contains("job"));
        assert!(!note.tags().contains("work"));

        // cascade survives reload
        let stats = StatsTracker::open(dirs.stats_file());
        let reloaded = NoteStore::open(&dirs, stats).unwrap();
        assert!(reloaded.get(&id).unwrap().tags().contains("job"));
    }

    #[test]
    fn rename_preserves_metadata() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, mut registry) = setup(&tmp);

        let before = registry.get("important").unwrap().clone();
        registry
            .rename("important", &tag("urgent"), &mut notes, now())
            .unwrap();
        assert_eq!(registry.get("urgent"), Some(&before));
    }

    #[test]
    fn rename_rejects_missing_or_taken_names() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, mut registry) = setup(&tmp);

        assert!(!registry
            .rename("ghost", &tag("anything"), &mut notes, now())
            .unwrap());
        assert!(!registry
            .rename("work", &tag("personal"), &mut notes, now())
            .unwrap());
        // self-rename is a successful no-op
        assert!(registry
            .rename("work", &tag("work"), &mut notes, now())
            .unwrap());
    }

    #[test]
    fn delete_strips_tag_from_notes() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, mut registry) = setup(&tmp);

        let id = notes
            .create("Tagged", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        registry
            .add_to_note("idea", &id, &mut notes, now())
            .unwrap();

        assert!(registry.delete("idea", &mut notes, now()).unwrap());
        assert!(!registry.contains("idea"));
        assert!(notes.get(&id).unwrap().tags().is_empty());
    }

    #[test]
    fn delete_missing_tag_returns_false() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, mut registry) = setup(&tmp);
        assert!(!registry.delete("ghost", &mut notes, now()).unwrap());
    }

    #[test]
    fn add_to_note_requires_registered_tag() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, registry) = setup(&tmp);

        let id = notes
            .create("Plain", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        assert!(!registry
            .add_to_note("unregistered", &id, &mut notes, now())
            .unwrap());
        assert!(!registry
            .add_to_note("work", &NoteId::new(), &mut notes, now())
            .unwrap());
    }

    #[test]
    fn add_to_note_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, registry) = setup(&tmp);

        let id = notes
            .create("Plain", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        assert!(registry.add_to_note("work", &id, &mut notes, now()).unwrap());
        assert!(registry.add_to_note("work", &id, &mut notes, now()).unwrap());
        assert_eq!(notes.get(&id).unwrap().tags().len(), 1);
    }

    #[test]
    fn remove_from_note_semantics() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, registry) = setup(&tmp);

        let id = notes
            .create("Plain", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        registry
            .add_to_note("work", &id, &mut notes, now())
            .unwrap();

        // not on note: no-op success
        assert!(registry
            .remove_from_note("idea", &id, &mut notes, now())
            .unwrap());
        // missing note: failure
        assert!(!registry
            .remove_from_note("work", &NoteId::new(), &mut notes, now())
            .unwrap());
        // actual removal
        assert!(registry
            .remove_from_note("work", &id, &mut notes, now())
            .unwrap());
        assert!(notes.get(&id).unwrap().tags().is_empty());
    }

    #[test]
    fn notes_with_tag_filters() {
        let tmp = TempDir::new().unwrap();
        let (_dirs, mut notes, registry) = setup(&tmp);

        let a = notes
            .create("A", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        let _b = notes
            .create("B", NoteContent::default(), NoteKind::Note, now())
            .unwrap();
        registry.add_to_note("work", &a, &mut notes, now()).unwrap();

        let tagged = registry.notes_with_tag("work", &notes);
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title(), "A");
    }
}
