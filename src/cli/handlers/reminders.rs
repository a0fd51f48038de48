//! Handlers for the `remind` subcommands.

use anyhow::{Context, Result, bail};
use std::io::BufRead;
use std::time::Duration;

use crate::cli::handlers::{AppContext, now, resolve_note, resolve_reminder};
use crate::cli::output::{Output, OutputFormat, ReminderListing};
use crate::cli::{
    RemindAddArgs, RemindArgs, RemindCommand, RemindIdArgs, RemindSnoozeArgs, RemindUpcomingArgs,
    RemindWatchArgs,
};
use crate::cli::date::parse_datetime_arg;
use crate::domain::{Reminder, Repeat};
use crate::store::scheduler::Scheduler;

pub fn handle_remind(args: &RemindArgs, ctx: &mut AppContext) -> Result<()> {
    match &args.action {
        RemindCommand::Add(args) => handle_add(args, ctx),
        RemindCommand::List(args) => print_reminders(&ctx.reminders.all(), args.format),
        RemindCommand::Overdue(args) => print_reminders(&ctx.reminders.overdue(now()), args.format),
        RemindCommand::Upcoming(args) => handle_upcoming(args, ctx),
        RemindCommand::Done(args) => handle_done(args, ctx),
        RemindCommand::Dismiss(args) => handle_dismiss(args, ctx),
        RemindCommand::Snooze(args) => handle_snooze(args, ctx),
        RemindCommand::Rm(args) => handle_rm(args, ctx),
        RemindCommand::Watch(args) => handle_watch(args, ctx),
    }
}

fn handle_add(args: &RemindAddArgs, ctx: &mut AppContext) -> Result<()> {
    let note_id = resolve_note(&ctx.notes, &args.note)?;
    let when = parse_datetime_arg(&args.at, false)?;
    let repeat: Repeat = args
        .repeat
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let title = match &args.title {
        Some(title) => title.clone(),
        None => ctx
            .notes
            .get(&note_id)
            .map(|n| n.title().to_string())
            .unwrap_or_default(),
    };

    let id = ctx
        .reminders
        .create(note_id, title, when, args.desc.clone(), repeat)
        .context("failed to save reminder")?;
    println!("Created reminder {id}");
    Ok(())
}

fn handle_upcoming(args: &RemindUpcomingArgs, ctx: &AppContext) -> Result<()> {
    if args.days < 0 {
        bail!("--days must be non-negative");
    }
    print_reminders(&ctx.reminders.upcoming(now(), args.days), args.format)
}

fn handle_done(args: &RemindIdArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_reminder(&ctx.reminders, &args.reminder)?;
    ctx.reminders.complete(&id)?;
    println!("Completed reminder {id}");
    Ok(())
}

fn handle_dismiss(args: &RemindIdArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_reminder(&ctx.reminders, &args.reminder)?;
    ctx.reminders.dismiss(&id)?;
    println!("Dismissed reminder {id}");
    Ok(())
}

fn handle_snooze(args: &RemindSnoozeArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_reminder(&ctx.reminders, &args.reminder)?;
    ctx.reminders.snooze(&id, args.minutes, now())?;
    println!("Snoozed reminder {} for {} minutes", id, args.minutes);
    Ok(())
}

fn handle_rm(args: &RemindIdArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_reminder(&ctx.reminders, &args.reminder)?;
    if !ctx.reminders.delete(&id)? {
        bail!("no reminder matches '{}'", args.reminder);
    }
    println!("Deleted reminder {id}");
    Ok(())
}

/// Runs the scheduler in the foreground until stdin closes, printing each
/// reminder as it fires.
fn handle_watch(args: &RemindWatchArgs, ctx: &AppContext) -> Result<()> {
    if args.interval == 0 {
        bail!("--interval must be at least 1 second");
    }

    ctx.reminders.set_notification_callback(|reminder| {
        println!("due: {reminder}");
        if !reminder.description().is_empty() {
            println!("     {}", reminder.description());
        }
    });

    let scheduler =
        Scheduler::start_with_tick(ctx.reminders.clone(), Duration::from_secs(args.interval));
    println!(
        "Watching reminders every {}s (Ctrl-D to stop)",
        args.interval
    );

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        // discard input until EOF
        let _ = line?;
    }

    drop(scheduler);
    ctx.reminders.clear_notification_callback();
    Ok(())
}

fn print_reminders(reminders: &[Reminder], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let listings: Vec<ReminderListing> = reminders
                .iter()
                .map(|r| ReminderListing {
                    id: r.id().to_string(),
                    note_id: r.note_id().to_string(),
                    title: r.title().to_string(),
                    datetime: r.datetime_str().to_string(),
                    repeat: r.repeat().to_string(),
                    completed: r.completed(),
                    dismissed: r.dismissed(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Human => {
            if reminders.is_empty() {
                println!("No reminders");
                return Ok(());
            }
            for reminder in reminders {
                let mut flags = Vec::new();
                if reminder.repeat() != Repeat::None {
                    flags.push(reminder.repeat().to_string());
                }
                if reminder.completed() {
                    flags.push("completed".to_string());
                }
                if reminder.dismissed() {
                    flags.push("dismissed".to_string());
                }
                let suffix = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", flags.join(", "))
                };
                println!("{reminder}{suffix}");
            }
        }
    }
    Ok(())
}
