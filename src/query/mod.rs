//! Filtered, sorted queries over the note collection.

use crate::domain::{Note, NoteContent, NoteKind};
use crate::store::notes::NoteStore;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Strips HTML tags so text filters match what the user sees, not the
/// markup around it.
fn strip_html(input: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap_or_else(|_| unreachable!()));
    tag.replace_all(input, "").into_owned()
}

/// Sort key for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Title,
    CreatedAt,
    #[default]
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A conjunctive filter over the note collection: every set field must
/// match for a note to be included.
///
/// Date bounds apply to `updated_at` and fail open: a note whose timestamp
/// is missing or unparsable passes the date filters rather than silently
/// disappearing from results.
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
    pub kind: Option<NoteKind>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// Runs queries against a note store by linear scan.
pub struct SearchEngine<'a> {
    notes: &'a NoteStore,
}

impl<'a> SearchEngine<'a> {
    pub fn new(notes: &'a NoteStore) -> Self {
        Self { notes }
    }

    /// All notes matching the query, sorted per its sort settings. Notes
    /// with an unparsable timestamp sort as the minimum value.
    pub fn search(&self, query: &NoteQuery) -> Vec<&'a Note> {
        let needle = query.text.as_ref().map(|t| t.to_lowercase());

        let mut results: Vec<&Note> = self
            .notes
            .list_all()
            .into_iter()
            .filter(|note| {
                needle
                    .as_deref()
                    .is_none_or(|needle| matches_text(note, needle))
            })
            .filter(|note| query.tags.iter().all(|tag| note.tags().contains(tag)))
            .filter(|note| match (query.date_from, note.updated_at()) {
                (Some(from), Some(updated)) => updated >= from,
                _ => true,
            })
            .filter(|note| match (query.date_to, note.updated_at()) {
                (Some(to), Some(updated)) => updated <= to,
                _ => true,
            })
            .filter(|note| query.kind.is_none_or(|kind| note.kind() == kind))
            .collect();

        match query.sort_by {
            SortBy::Title => {
                results.sort_by_key(|note| note.title().to_lowercase());
            }
            SortBy::CreatedAt => {
                results.sort_by_key(|note| note.created_at().unwrap_or(NaiveDateTime::MIN));
            }
            SortBy::UpdatedAt => {
                results.sort_by_key(|note| note.updated_at().unwrap_or(NaiveDateTime::MIN));
            }
        }
        if query.sort_order == SortOrder::Desc {
            results.reverse();
        }
        results
    }

    /// Tags in use across the collection with their usage counts, most
    /// used first; ties break alphabetically.
    pub fn get_all_tags(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for note in self.notes.list_all() {
            for tag in note.tags() {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        let mut tags: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags
    }
}

/// Case-insensitive text match against the title and content. Rich-text
/// content is matched with its HTML stripped; task-list content is matched
/// against its serialized form.
fn matches_text(note: &Note, needle_lower: &str) -> bool {
    if note.title().to_lowercase().contains(needle_lower) {
        return true;
    }
    let haystack = match note.content() {
        NoteContent::Text(html) => strip_html(html),
        tasks @ NoteContent::Tasks(_) => tasks.search_text(),
    };
    haystack.to_lowercase().contains(needle_lower)
}
