//! CLI command definitions and handlers

pub mod config;
pub mod date;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// nook - notes, tags, and reminders in plain JSON files
#[derive(Parser, Debug)]
#[command(name = "nook", version, about, long_about = None)]
pub struct Cli {
    /// Data directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new note
    New(NewArgs),

    /// List notes, optionally filtered by tag and kind
    #[command(name = "ls")]
    List(ListArgs),

    /// Show a note's contents
    Show(ShowArgs),

    /// Edit a note's title, content, or date
    Edit(EditArgs),

    /// Delete a note
    Rm(RmArgs),

    /// Search notes with text, tag, date, and kind filters
    Search(SearchArgs),

    /// List all tags
    Tags(TagsArgs),

    /// Add a tag to a note
    Tag(TagArgs),

    /// Remove a tag from a note
    Untag(UntagArgs),

    /// Register a new tag
    #[command(name = "tag-new")]
    TagNew(TagNewArgs),

    /// Rename a tag everywhere it is used
    #[command(name = "tag-rename")]
    TagRename(TagRenameArgs),

    /// Delete a tag everywhere it is used
    #[command(name = "tag-rm")]
    TagRm(TagRmArgs),

    /// Manage reminders
    Remind(RemindArgs),

    /// Manage note templates
    Templates(TemplatesArgs),

    /// Show usage statistics
    Stats(StatsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title (defaults to the template's title when --template is used)
    #[arg(required_unless_present = "template")]
    pub title: Option<String>,

    /// Note content (HTML or plain text)
    #[arg(short, long)]
    pub content: Option<String>,

    /// Task item (can be specified multiple times; makes this a task list)
    #[arg(long = "task", action = ArgAction::Append, conflicts_with = "content")]
    pub tasks: Vec<String>,

    /// Tag for the note, must already be registered (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Start from a template
    #[arg(long)]
    pub template: Option<String>,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Filter by tag (can be specified multiple times, all must match)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Filter by kind (note or task_list)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID (or unambiguous prefix) or exact title
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Note ID (or unambiguous prefix) or exact title
    pub note: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Associated calendar date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Clear the associated calendar date
    #[arg(long, conflicts_with = "date")]
    pub clear_date: bool,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Note ID (or unambiguous prefix) or exact title
    pub note: String,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Text to search for in titles and content
    pub query: Option<String>,

    /// Filter by tag (can be specified multiple times, all must match)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Only notes updated at or after this date
    #[arg(long)]
    pub from: Option<String>,

    /// Only notes updated at or before this date
    #[arg(long)]
    pub to: Option<String>,

    /// Filter by kind (note or task_list)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Sort field
    #[arg(long, value_enum, default_value_t = SortField::Updated)]
    pub sort: SortField,

    /// Sort order
    #[arg(long, value_enum, default_value_t = Order::Desc)]
    pub order: Order,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Sort field for search results.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum SortField {
    Title,
    Created,
    #[default]
    Updated,
}

/// Sort order for search results.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Show usage counts for each tag
    #[arg(long)]
    pub counts: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tag` command (add tag to note)
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Note ID (or unambiguous prefix) or exact title
    pub note: String,

    /// Tag to add (must be registered)
    pub tag: String,
}

/// Arguments for the `untag` command (remove tag from note)
#[derive(Parser, Debug)]
pub struct UntagArgs {
    /// Note ID (or unambiguous prefix) or exact title
    pub note: String,

    /// Tag to remove
    pub tag: String,
}

/// Arguments for the `tag-new` command
#[derive(Parser, Debug)]
pub struct TagNewArgs {
    /// Tag name
    pub name: String,

    /// Display color as RGB hex, e.g. "#FF5733"
    #[arg(long)]
    pub color: Option<String>,

    /// Icon reference
    #[arg(long)]
    pub icon: Option<String>,
}

/// Arguments for the `tag-rename` command
#[derive(Parser, Debug)]
pub struct TagRenameArgs {
    /// Current tag name
    pub old: String,

    /// New tag name
    pub new: String,
}

/// Arguments for the `tag-rm` command
#[derive(Parser, Debug)]
pub struct TagRmArgs {
    /// Tag to delete
    pub name: String,
}

/// Arguments for the `remind` command
#[derive(Parser, Debug)]
pub struct RemindArgs {
    #[command(subcommand)]
    pub action: RemindCommand,
}

#[derive(Subcommand, Debug)]
pub enum RemindCommand {
    /// Add a reminder to a note
    Add(RemindAddArgs),

    /// List all reminders
    #[command(name = "ls")]
    List(RemindListArgs),

    /// List overdue reminders
    Overdue(RemindListArgs),

    /// List upcoming reminders
    Upcoming(RemindUpcomingArgs),

    /// Mark a reminder completed
    Done(RemindIdArgs),

    /// Dismiss a reminder
    Dismiss(RemindIdArgs),

    /// Snooze a reminder for a number of minutes
    Snooze(RemindSnoozeArgs),

    /// Delete a reminder
    Rm(RemindIdArgs),

    /// Run the scheduler in the foreground, printing reminders as they fire
    Watch(RemindWatchArgs),
}

/// Arguments for `remind add`
#[derive(Parser, Debug)]
pub struct RemindAddArgs {
    /// Note ID (or unambiguous prefix) or exact title
    pub note: String,

    /// When to fire (YYYY-MM-DDTHH:MM[:SS])
    pub at: String,

    /// Reminder title (defaults to the note title)
    #[arg(long)]
    pub title: Option<String>,

    /// Description shown with the notification
    #[arg(short = 'D', long, default_value = "")]
    pub desc: String,

    /// Recurrence: none, daily, weekly, or monthly
    #[arg(short, long, default_value = "none")]
    pub repeat: String,
}

/// Arguments for reminder listings
#[derive(Parser, Debug)]
pub struct RemindListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `remind upcoming`
#[derive(Parser, Debug)]
pub struct RemindUpcomingArgs {
    /// How many days ahead to look
    #[arg(long, default_value_t = 7)]
    pub days: i64,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for commands addressing a single reminder
#[derive(Parser, Debug)]
pub struct RemindIdArgs {
    /// Reminder ID or unambiguous prefix
    pub reminder: String,
}

/// Arguments for `remind snooze`
#[derive(Parser, Debug)]
pub struct RemindSnoozeArgs {
    /// Reminder ID or unambiguous prefix
    pub reminder: String,

    /// Minutes to snooze for
    #[arg(default_value_t = 10)]
    pub minutes: u32,
}

/// Arguments for `remind watch`
#[derive(Parser, Debug)]
pub struct RemindWatchArgs {
    /// Poll interval in seconds
    #[arg(long, default_value_t = 60)]
    pub interval: u64,
}

/// Arguments for the `templates` command
#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub action: TemplateCommand,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// List available templates
    #[command(name = "ls")]
    List(TemplateListArgs),

    /// Save a custom template
    Save(TemplateSaveArgs),

    /// Delete a custom template
    Rm(TemplateRmArgs),
}

/// Arguments for `templates ls`
#[derive(Parser, Debug)]
pub struct TemplateListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `templates save`
#[derive(Parser, Debug)]
pub struct TemplateSaveArgs {
    /// Template name
    pub name: String,

    /// Title for notes created from this template
    #[arg(long)]
    pub title: String,

    /// Content for notes created from this template
    #[arg(short, long, default_value = "")]
    pub content: String,

    /// Short description
    #[arg(short = 'D', long, default_value = "")]
    pub desc: String,
}

/// Arguments for `templates rm`
#[derive(Parser, Debug)]
pub struct TemplateRmArgs {
    /// Template to delete
    pub name: String,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
