//! Handlers for note CRUD commands.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::cli::handlers::{AppContext, now, resolve_note};
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::cli::{EditArgs, ListArgs, NewArgs, RmArgs, ShowArgs};
use crate::domain::{Note, NoteContent, NoteId, NoteKind, TaskItem};

pub fn handle_new(args: &NewArgs, ctx: &mut AppContext) -> Result<()> {
    let id = match &args.template {
        Some(template) => {
            let Some(id) = ctx
                .templates
                .create_note_from_template(template, &mut ctx.notes, now())?
            else {
                bail!("no template named '{template}'");
            };
            if let Some(title) = &args.title {
                let note = note_or_bail(&ctx.notes, &id)?;
                let content = note.content().clone();
                let kind = note.kind();
                ctx.notes
                    .update(&id, title.clone(), content, Some(kind), None, now())?;
            }
            id
        }
        None => {
            let (content, kind) = if args.tasks.is_empty() {
                (
                    NoteContent::Text(args.content.clone().unwrap_or_default()),
                    NoteKind::Note,
                )
            } else {
                (
                    NoteContent::Tasks(
                        args.tasks.iter().map(|t| TaskItem::new(t.clone())).collect(),
                    ),
                    NoteKind::TaskList,
                )
            };
            let title = args.title.clone().unwrap_or_default();
            ctx.notes.create(title, content, kind, now())?
        }
    };

    for tag in &args.tags {
        let added = ctx.tags.add_to_note(tag, &id, &mut ctx.notes, now())?;
        if !added {
            bail!("unknown tag '{tag}' (register it first with 'nook tag-new')");
        }
    }

    let note = note_or_bail(&ctx.notes, &id)?;
    println!("Created note {}: {}", id, note.title());
    Ok(())
}

pub fn handle_list(args: &ListArgs, ctx: &AppContext) -> Result<()> {
    let kind = parse_kind(args.kind.as_deref())?;
    let notes: Vec<&Note> = ctx
        .notes
        .list_all()
        .into_iter()
        .filter(|n| args.tags.iter().all(|tag| n.tags().contains(tag)))
        .filter(|n| kind.is_none_or(|k| n.kind() == k))
        .collect();

    print_note_listings(&notes, args.format)
}

pub fn handle_show(args: &ShowArgs, ctx: &AppContext) -> Result<()> {
    let id = resolve_note(&ctx.notes, &args.note)?;
    let note = note_or_bail(&ctx.notes, &id)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(note))?);
        }
        OutputFormat::Human => {
            println!("{}", note.title());
            println!("  id:      {}", note.id());
            println!("  kind:    {}", note.kind());
            if !note.tags().is_empty() {
                let tags: Vec<&str> = note.tags().iter().map(String::as_str).collect();
                println!("  tags:    {}", tags.join(", "));
            }
            if let Some(date) = note.date() {
                println!("  date:    {date}");
            }
            if let Some(created) = note.created_at() {
                println!("  created: {created}");
            }
            if let Some(updated) = note.updated_at() {
                println!("  updated: {updated}");
            }
            println!();
            match note.content() {
                NoteContent::Text(text) => {
                    if !text.is_empty() {
                        println!("{text}");
                    }
                }
                NoteContent::Tasks(items) => {
                    for item in items {
                        let mark = if item.completed { "x" } else { " " };
                        println!("  [{mark}] {}", item.text);
                    }
                }
            }

            let reminders = ctx.reminders.for_note(&id);
            if !reminders.is_empty() {
                println!();
                println!("Reminders:");
                for reminder in reminders {
                    println!("  {reminder}");
                }
            }
        }
    }
    Ok(())
}

pub fn handle_edit(args: &EditArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_note(&ctx.notes, &args.note)?;
    let note = note_or_bail(&ctx.notes, &id)?;

    if args.title.is_some() || args.content.is_some() {
        let title = args.title.clone().unwrap_or_else(|| note.title().to_string());
        let content = match &args.content {
            Some(content) => NoteContent::Text(content.clone()),
            None => note.content().clone(),
        };
        ctx.notes.update(&id, title, content, None, None, now())?;
    }

    if args.clear_date {
        ctx.notes.set_date(&id, None, now())?;
    } else if let Some(date) = &args.date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{date}': expected YYYY-MM-DD"))?;
        ctx.notes.set_date(&id, Some(date), now())?;
    }

    println!("Updated note {id}");
    Ok(())
}

pub fn handle_rm(args: &RmArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_note(&ctx.notes, &args.note)?;
    if !ctx.notes.delete(&id)? {
        bail!("no note matches '{}'", args.note);
    }
    println!("Deleted note {id}");
    Ok(())
}

fn note_or_bail<'a>(notes: &'a crate::store::NoteStore, id: &NoteId) -> Result<&'a Note> {
    notes
        .get(id)
        .with_context(|| format!("note {id} disappeared"))
}

pub(crate) fn parse_kind(arg: Option<&str>) -> Result<Option<NoteKind>> {
    match arg {
        None => Ok(None),
        Some(s) => s
            .parse::<NoteKind>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!(e)),
    }
}

pub(crate) fn print_note_listings(notes: &[&Note], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes
                .iter()
                .map(|n| NoteListing {
                    id: n.id().to_string(),
                    title: n.title().to_string(),
                    kind: n.kind().to_string(),
                    tags: n.tags().iter().cloned().collect(),
                    updated_at: n.updated_at().map(|dt| dt.to_string()),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found");
                return Ok(());
            }
            for note in notes {
                let tags = if note.tags().is_empty() {
                    String::new()
                } else {
                    let joined: Vec<&str> = note.tags().iter().map(String::as_str).collect();
                    format!("  #{}", joined.join(" #"))
                };
                println!("{} {}{}", note.id().prefix(), note.title(), tags);
            }
        }
    }
    Ok(())
}
