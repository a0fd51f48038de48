//! Note templates: predefined starting points plus user-defined ones.

use crate::domain::{NoteContent, NoteId, NoteKind, TaskItem};
use crate::store::fs::{StoreError, read_json, write_json_atomic};
use crate::store::notes::NoteStore;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A reusable starting point for a new note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub title: String,
    pub content: NoteContent,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub builtin: bool,
}

fn builtin_templates() -> BTreeMap<String, Template> {
    let mut templates = BTreeMap::new();
    templates.insert(
        "blank_note".to_string(),
        Template {
            title: "New Note".to_string(),
            content: NoteContent::Text(String::new()),
            kind: NoteKind::Note,
            description: "An empty note".to_string(),
            builtin: true,
        },
    );
    templates.insert(
        "meeting_notes".to_string(),
        Template {
            title: "Meeting Notes".to_string(),
            content: NoteContent::Text(
                "<h2>Agenda</h2><ul><li></li></ul><h2>Decisions</h2><ul><li></li></ul><h2>Action Items</h2><ul><li></li></ul>"
                    .to_string(),
            ),
            kind: NoteKind::Note,
            description: "Agenda, decisions, and action items".to_string(),
            builtin: true,
        },
    );
    templates.insert(
        "daily_planner".to_string(),
        Template {
            title: "Daily Planner".to_string(),
            content: NoteContent::Tasks(vec![
                TaskItem::new("Morning: "),
                TaskItem::new("Afternoon: "),
                TaskItem::new("Evening: "),
            ]),
            kind: NoteKind::TaskList,
            description: "Plan the day in three blocks".to_string(),
            builtin: true,
        },
    );
    templates.insert(
        "shopping_list".to_string(),
        Template {
            title: "Shopping List".to_string(),
            content: NoteContent::Tasks(Vec::new()),
            kind: NoteKind::TaskList,
            description: "An empty shopping checklist".to_string(),
            builtin: true,
        },
    );
    templates
}

/// Template collection persisted to templates.json.
///
/// Built-in templates are always present and cannot be overwritten or
/// deleted; custom templates live in the same file alongside them.
pub struct TemplateStore {
    path: PathBuf,
    templates: BTreeMap<String, Template>,
}

impl TemplateStore {
    /// Loads templates.json. A missing file is seeded with the built-ins
    /// and persisted; a corrupt file is logged and replaced by the
    /// built-ins alone. Built-ins missing from a loaded file are restored.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut templates = match read_json::<BTreeMap<String, Template>>(&path) {
            Ok(templates) => templates,
            Err(StoreError::NotFound { .. }) => {
                let defaults = builtin_templates();
                write_json_atomic(&path, &defaults)?;
                defaults
            }
            Err(err) => {
                log::warn!("resetting unreadable templates file: {err}");
                builtin_templates()
            }
        };
        for (name, template) in builtin_templates() {
            templates.entry(name).or_insert(template);
        }
        Ok(Self { path, templates })
    }

    pub fn all(&self) -> &BTreeMap<String, Template> {
        &self.templates
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Saves a custom template. Returns false when the name collides with
    /// a built-in; an existing custom template is overwritten.
    pub fn save_custom(&mut self, name: &str, template: Template) -> Result<bool, StoreError> {
        if self.templates.get(name).is_some_and(|t| t.builtin) {
            return Ok(false);
        }
        self.templates.insert(
            name.to_string(),
            Template {
                builtin: false,
                ..template
            },
        );
        write_json_atomic(&self.path, &self.templates)?;
        Ok(true)
    }

    /// Deletes a custom template. Returns false for built-ins and unknown
    /// names.
    pub fn delete_custom(&mut self, name: &str) -> Result<bool, StoreError> {
        match self.templates.get(name) {
            None => return Ok(false),
            Some(t) if t.builtin => return Ok(false),
            Some(_) => {}
        }
        self.templates.remove(name);
        write_json_atomic(&self.path, &self.templates)?;
        Ok(true)
    }

    /// Instantiates a template as a fresh note. Returns `None` when the
    /// template doesn't exist.
    pub fn create_note_from_template(
        &self,
        name: &str,
        notes: &mut NoteStore,
        now: NaiveDateTime,
    ) -> Result<Option<NoteId>, StoreError> {
        let Some(template) = self.templates.get(name) else {
            return Ok(None);
        };
        let id = notes.create(
            template.title.clone(),
            template.content.clone(),
            template.kind,
            now,
        )?;
        Ok(Some(id))
    }
}
