//! Note persistence: one JSON file per note under `notes/`.

use crate::domain::{Note, NoteContent, NoteId, NoteKind};
use crate::store::fs::{StoreError, read_json, write_json_atomic};
use crate::store::paths::DataDirs;
use crate::store::stats::{StatEvent, StatsTracker};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use walkdir::WalkDir;

/// In-memory index over the per-note JSON files.
///
/// All notes are loaded at open and kept in memory; every mutation writes
/// the affected file before touching the in-memory map, so a failed write
/// leaves the map consistent with the disk.
pub struct NoteStore {
    notes_dir: PathBuf,
    notes: HashMap<NoteId, Note>,
    stats: StatsTracker,
}

impl NoteStore {
    /// Loads every note from the notes directory, creating it if missing.
    ///
    /// A file that fails to parse is logged and skipped; one corrupt note
    /// never takes the rest of the collection down with it.
    pub fn open(dirs: &DataDirs, stats: StatsTracker) -> Result<Self, StoreError> {
        dirs.ensure()?;
        let notes_dir = dirs.notes_dir();

        let mut notes = HashMap::new();
        for entry in WalkDir::new(&notes_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        {
            match read_json::<Note>(entry.path()) {
                Ok(note) => {
                    notes.insert(note.id().clone(), note);
                }
                Err(err) => {
                    log::warn!("skipping unreadable note file: {err}");
                }
            }
        }

        Ok(Self {
            notes_dir,
            notes,
            stats,
        })
    }

    fn note_path(&self, id: &NoteId) -> PathBuf {
        self.notes_dir.join(format!("{id}.json"))
    }

    fn persist(&self, note: &Note) -> Result<(), StoreError> {
        write_json_atomic(&self.note_path(note.id()), note)
    }

    /// Creates and persists a new note, returning its id.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: NoteContent,
        kind: NoteKind,
        now: NaiveDateTime,
    ) -> Result<NoteId, StoreError> {
        let id = NoteId::new();
        let note = Note::new(id.clone(), title, content, kind, now);
        self.persist(&note)?;
        self.notes.insert(id.clone(), note);
        self.stats.record(StatEvent::NoteCreated);
        Ok(id)
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Overwrites title and content and merges kind/tags, bumping
    /// `updated_at`. Returns false if the note doesn't exist.
    pub fn update(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        content: NoteContent,
        kind: Option<NoteKind>,
        tags: Option<BTreeSet<String>>,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        let Some(note) = self.notes.get_mut(id) else {
            return Ok(false);
        };
        note.apply_update(title, content, kind, tags, now);
        self.persist(&self.notes[id])?;
        self.stats.record(StatEvent::NoteEdited);
        Ok(true)
    }

    /// Deletes a note. Returns true if the note existed; an already-missing
    /// file with a live in-memory entry still counts as deleted.
    pub fn delete(&mut self, id: &NoteId) -> Result<bool, StoreError> {
        if self.notes.remove(id).is_none() {
            return Ok(false);
        }
        let path = self.note_path(id);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::from_io(&path, e)),
        }
        self.stats.record(StatEvent::NoteDeleted);
        Ok(true)
    }

    /// All notes, most recently updated first. Notes whose `updated_at`
    /// failed to parse sort last.
    pub fn list_all(&self) -> Vec<&Note> {
        let mut all: Vec<&Note> = self.notes.values().collect();
        all.sort_by(|a, b| {
            let a_key = a.updated_at().unwrap_or(NaiveDateTime::MIN);
            let b_key = b.updated_at().unwrap_or(NaiveDateTime::MIN);
            b_key.cmp(&a_key).then_with(|| a.id().cmp(b.id()))
        });
        all
    }

    /// Case-insensitive substring search over titles and content.
    /// An empty query matches every note.
    pub fn search_substring(&self, query: &str) -> Vec<&Note> {
        let needle = query.to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|note| note.matches_substring(&needle))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.notes.len()
    }

    /// Replaces a note's tag set, used by the tag registry for cascades.
    /// Returns false if the note doesn't exist.
    pub(crate) fn set_note_tags(
        &mut self,
        id: &NoteId,
        tags: BTreeSet<String>,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        let Some(note) = self.notes.get_mut(id) else {
            return Ok(false);
        };
        note.set_tags(tags, now);
        self.persist(&self.notes[id])?;
        Ok(true)
    }

    /// Sets or clears a note's associated calendar date.
    pub fn set_date(
        &mut self,
        id: &NoteId,
        date: Option<NaiveDate>,
        now: NaiveDateTime,
    ) -> Result<bool, StoreError> {
        let Some(note) = self.notes.get_mut(id) else {
            return Ok(false);
        };
        note.set_date(date, now);
        self.persist(&self.notes[id])?;
        Ok(true)
    }

    pub(crate) fn stats(&self) -> &StatsTracker {
        &self.stats
    }
}
