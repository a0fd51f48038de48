//! Command handlers for the CLI.

mod misc;
mod notes;
mod reminders;
mod search;
mod tags;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDateTime};

use crate::domain::{NoteId, ReminderId};
use crate::store::notes::NoteStore;
use crate::store::paths::DataDirs;
use crate::store::reminders::ReminderStore;
use crate::store::stats::StatsTracker;
use crate::store::tags::TagRegistry;
use crate::store::templates::TemplateStore;

// Re-export public items
pub use misc::{handle_completions, handle_stats, handle_templates};
pub use notes::{handle_edit, handle_list, handle_new, handle_rm, handle_show};
pub use reminders::handle_remind;
pub use search::handle_search;
pub use tags::{
    handle_tag, handle_tag_new, handle_tag_rename, handle_tag_rm, handle_tags, handle_untag,
};

/// All stores opened against one data directory.
pub struct AppContext {
    pub dirs: DataDirs,
    pub notes: NoteStore,
    pub tags: TagRegistry,
    pub reminders: ReminderStore,
    pub templates: TemplateStore,
    pub stats: StatsTracker,
}

impl AppContext {
    pub fn open(dirs: DataDirs) -> Result<Self> {
        let stats = StatsTracker::open(dirs.stats_file());
        let notes = NoteStore::open(&dirs, stats.clone()).with_context(|| {
            format!("failed to open note store in {}", dirs.root().display())
        })?;
        let tags = TagRegistry::open(dirs.tags_file(), stats.clone())
            .context("failed to open tag registry")?;
        let reminders = ReminderStore::open(dirs.reminders_file(), stats.clone(), now())
            .context("failed to open reminder store")?;
        let templates =
            TemplateStore::open(dirs.templates_file()).context("failed to open templates")?;
        Ok(Self {
            dirs,
            notes,
            tags,
            reminders,
            templates,
            stats,
        })
    }
}

/// The local wall-clock time all handlers stamp with.
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Resolves a note argument: a full ID, an unambiguous ID prefix, or an
/// exact title (case-insensitive).
pub fn resolve_note(notes: &NoteStore, arg: &str) -> Result<NoteId> {
    if let Ok(id) = arg.parse::<NoteId>() {
        if notes.get(&id).is_some() {
            return Ok(id);
        }
    }

    let prefix = arg.to_uppercase();
    let mut matches: Vec<NoteId> = notes
        .list_all()
        .into_iter()
        .filter(|n| {
            n.id().to_string().starts_with(&prefix) || n.title().eq_ignore_ascii_case(arg)
        })
        .map(|n| n.id().clone())
        .collect();

    match matches.len() {
        0 => bail!("no note matches '{arg}'"),
        1 => Ok(matches.swap_remove(0)),
        n => bail!("'{arg}' is ambiguous: matches {n} notes"),
    }
}

/// Resolves a reminder argument: a full ID or an unambiguous prefix.
pub fn resolve_reminder(reminders: &ReminderStore, arg: &str) -> Result<ReminderId> {
    if let Ok(id) = arg.parse::<ReminderId>() {
        if reminders.get(&id).is_some() {
            return Ok(id);
        }
    }

    let prefix = arg.to_uppercase();
    let mut matches: Vec<ReminderId> = reminders
        .all()
        .iter()
        .filter(|r| r.id().to_string().starts_with(&prefix))
        .map(|r| r.id().clone())
        .collect();

    match matches.len() {
        0 => bail!("no reminder matches '{arg}'"),
        1 => Ok(matches.swap_remove(0)),
        n => bail!("'{arg}' is ambiguous: matches {n} reminders"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoteContent, NoteKind, Repeat, parse_datetime};
    use tempfile::TempDir;

    fn ctx(tmp: &TempDir) -> AppContext {
        AppContext::open(DataDirs::new(tmp.path().join("data"))).unwrap()
    }

    #[test]
    fn resolve_note_by_full_id_prefix_and_title() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = ctx(&tmp);
        let id = ctx
            .notes
            .create(
                "Groceries",
                NoteContent::default(),
                NoteKind::Note,
                parse_datetime("2024-03-01T10:00:00").unwrap(),
            )
            .unwrap();

        assert_eq!(resolve_note(&ctx.notes, &id.to_string()).unwrap(), id);
        assert_eq!(resolve_note(&ctx.notes, &id.prefix()).unwrap(), id);
        assert_eq!(resolve_note(&ctx.notes, "groceries").unwrap(), id);
        assert!(resolve_note(&ctx.notes, "missing").is_err());
    }

    #[test]
    fn resolve_reminder_by_prefix() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = ctx(&tmp);
        let note = ctx
            .notes
            .create(
                "Host",
                NoteContent::default(),
                NoteKind::Note,
                parse_datetime("2024-03-01T10:00:00").unwrap(),
            )
            .unwrap();
        let id = ctx
            .reminders
            .create(
                note,
                "Ping",
                parse_datetime("2024-03-02T10:00:00").unwrap(),
                "",
                Repeat::None,
            )
            .unwrap();

        assert_eq!(resolve_reminder(&ctx.reminders, &id.prefix()).unwrap(), id);
        assert!(resolve_reminder(&ctx.reminders, "nope").is_err());
    }
}
