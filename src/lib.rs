//! nook - notes, tags, and reminders in plain JSON files

pub mod cli;
pub mod domain;
pub mod query;
pub mod store;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        AppContext, handle_completions, handle_edit, handle_list, handle_new, handle_remind,
        handle_rm, handle_search, handle_show, handle_stats, handle_tag, handle_tag_new,
        handle_tag_rename, handle_tag_rm, handle_tags, handle_templates, handle_untag,
    },
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // completions need no data directory
    if let Command::Completions(args) = &cli.command {
        return handle_completions(args);
    }

    let config = Config::load()?;
    let dirs = config
        .data_dir(cli.dir.as_ref())
        .context("could not determine a data directory; pass --dir")?;
    let mut ctx = AppContext::open(dirs)?;

    match &cli.command {
        Command::New(args) => handle_new(args, &mut ctx),
        Command::List(args) => handle_list(args, &ctx),
        Command::Show(args) => handle_show(args, &ctx),
        Command::Edit(args) => handle_edit(args, &mut ctx),
        Command::Rm(args) => handle_rm(args, &mut ctx),
        Command::Search(args) => handle_search(args, &ctx),
        Command::Tags(args) => handle_tags(args, &ctx),
        Command::Tag(args) => handle_tag(args, &mut ctx),
        Command::Untag(args) => handle_untag(args, &mut ctx),
        Command::TagNew(args) => handle_tag_new(args, &mut ctx),
        Command::TagRename(args) => handle_tag_rename(args, &mut ctx),
        Command::TagRm(args) => handle_tag_rm(args, &mut ctx),
        Command::Remind(args) => handle_remind(args, &mut ctx),
        Command::Templates(args) => handle_templates(args, &mut ctx),
        Command::Stats(args) => handle_stats(args, &ctx),
        Command::Completions(args) => handle_completions(args),
    }
}
