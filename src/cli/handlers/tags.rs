//! Handlers for tag commands.

use anyhow::{Context, Result, bail};

use crate::cli::handlers::{AppContext, now, resolve_note};
use crate::cli::output::{Output, OutputFormat, TagListing};
use crate::cli::{TagArgs, TagNewArgs, TagRenameArgs, TagRmArgs, TagsArgs, UntagArgs};
use crate::domain::{TagInfo, TagName};
use crate::query::SearchEngine;

pub fn handle_tags(args: &TagsArgs, ctx: &AppContext) -> Result<()> {
    let usage = if args.counts {
        SearchEngine::new(&ctx.notes).get_all_tags()
    } else {
        Vec::new()
    };

    let listings: Vec<TagListing> = ctx
        .tags
        .all()
        .iter()
        .map(|(name, info)| TagListing {
            name: name.clone(),
            color: info.color.clone(),
            count: args.counts.then(|| {
                usage
                    .iter()
                    .find(|(tag, _)| tag == name)
                    .map_or(0, |(_, count)| *count)
            }),
        })
        .collect();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No tags registered");
                return Ok(());
            }
            for listing in listings {
                match listing.count {
                    Some(count) => println!("{} ({count})", listing.name),
                    None => println!("{}", listing.name),
                }
            }
        }
    }
    Ok(())
}

pub fn handle_tag(args: &TagArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_note(&ctx.notes, &args.note)?;
    let added = ctx.tags.add_to_note(&args.tag, &id, &mut ctx.notes, now())?;
    if !added {
        bail!(
            "unknown tag '{}' (register it first with 'nook tag-new')",
            args.tag
        );
    }
    println!("Tagged note {} with '{}'", id, args.tag);
    Ok(())
}

pub fn handle_untag(args: &UntagArgs, ctx: &mut AppContext) -> Result<()> {
    let id = resolve_note(&ctx.notes, &args.note)?;
    ctx.tags
        .remove_from_note(&args.tag, &id, &mut ctx.notes, now())?;
    println!("Removed tag '{}' from note {}", args.tag, id);
    Ok(())
}

pub fn handle_tag_new(args: &TagNewArgs, ctx: &mut AppContext) -> Result<()> {
    let name: TagName = args
        .name
        .parse()
        .with_context(|| format!("invalid tag name '{}'", args.name))?;
    let mut info = TagInfo::default();
    if let Some(color) = &args.color {
        info.color = color.clone();
    }
    if let Some(icon) = &args.icon {
        info.icon = icon.clone();
    }

    if !ctx.tags.create(&name, info)? {
        bail!("tag '{name}' already exists");
    }
    println!("Created tag '{name}'");
    Ok(())
}

pub fn handle_tag_rename(args: &TagRenameArgs, ctx: &mut AppContext) -> Result<()> {
    let new: TagName = args
        .new
        .parse()
        .with_context(|| format!("invalid tag name '{}'", args.new))?;
    if !ctx.tags.rename(&args.old, &new, &mut ctx.notes, now())? {
        bail!(
            "cannot rename '{}' to '{}': source missing or target taken",
            args.old,
            args.new
        );
    }
    println!("Renamed tag '{}' to '{}'", args.old, new);
    Ok(())
}

pub fn handle_tag_rm(args: &TagRmArgs, ctx: &mut AppContext) -> Result<()> {
    if !ctx.tags.delete(&args.name, &mut ctx.notes, now())? {
        bail!("no tag named '{}'", args.name);
    }
    println!("Deleted tag '{}'", args.name);
    Ok(())
}
