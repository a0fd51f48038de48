//! Handlers for templates, stats, and shell completions.

use anyhow::{Result, bail};
use clap::CommandFactory;

use crate::cli::handlers::AppContext;
use crate::cli::output::{Output, OutputFormat, TemplateListing};
use crate::cli::{
    Cli, CompletionsArgs, StatsArgs, TemplateCommand, TemplateListArgs, TemplateRmArgs,
    TemplateSaveArgs, TemplatesArgs,
};
use crate::domain::{NoteContent, NoteKind};
use crate::store::templates::Template;

pub fn handle_templates(args: &TemplatesArgs, ctx: &mut AppContext) -> Result<()> {
    match &args.action {
        TemplateCommand::List(args) => handle_list(args, ctx),
        TemplateCommand::Save(args) => handle_save(args, ctx),
        TemplateCommand::Rm(args) => handle_rm(args, ctx),
    }
}

fn handle_list(args: &TemplateListArgs, ctx: &AppContext) -> Result<()> {
    let listings: Vec<TemplateListing> = ctx
        .templates
        .all()
        .iter()
        .map(|(name, template)| TemplateListing {
            name: name.clone(),
            title: template.title.clone(),
            kind: template.kind.to_string(),
            description: template.description.clone(),
            builtin: template.builtin,
        })
        .collect();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Human => {
            for listing in listings {
                let marker = if listing.builtin { "*" } else { " " };
                if listing.description.is_empty() {
                    println!("{marker} {}", listing.name);
                } else {
                    println!("{marker} {} - {}", listing.name, listing.description);
                }
            }
        }
    }
    Ok(())
}

fn handle_save(args: &TemplateSaveArgs, ctx: &mut AppContext) -> Result<()> {
    let template = Template {
        title: args.title.clone(),
        content: NoteContent::Text(args.content.clone()),
        kind: NoteKind::Note,
        description: args.desc.clone(),
        builtin: false,
    };
    if !ctx.templates.save_custom(&args.name, template)? {
        bail!("'{}' is a built-in template and cannot be replaced", args.name);
    }
    println!("Saved template '{}'", args.name);
    Ok(())
}

fn handle_rm(args: &TemplateRmArgs, ctx: &mut AppContext) -> Result<()> {
    if !ctx.templates.delete_custom(&args.name)? {
        bail!("no custom template named '{}'", args.name);
    }
    println!("Deleted template '{}'", args.name);
    Ok(())
}

pub fn handle_stats(args: &StatsArgs, ctx: &AppContext) -> Result<()> {
    let counters = ctx.stats.snapshot();
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(&counters))?);
        }
        OutputFormat::Human => {
            println!("notes created:       {}", counters.notes_created);
            println!("notes edited:        {}", counters.notes_edited);
            println!("notes deleted:       {}", counters.notes_deleted);
            println!("tags created:        {}", counters.tags_created);
            println!("tags deleted:        {}", counters.tags_deleted);
            println!("reminders created:   {}", counters.reminders_created);
            println!("reminders completed: {}", counters.reminders_completed);
            println!("searches:            {}", counters.searches);
        }
    }
    Ok(())
}

pub fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "nook", &mut std::io::stdout());
    Ok(())
}
