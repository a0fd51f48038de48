//! Handler for the `search` command.

use anyhow::Result;

use crate::cli::handlers::AppContext;
use crate::cli::handlers::notes::{parse_kind, print_note_listings};
use crate::cli::{Order, SearchArgs, SortField};
use crate::cli::date::parse_datetime_arg;
use crate::query::{NoteQuery, SearchEngine, SortBy, SortOrder};
use crate::store::stats::StatEvent;

pub fn handle_search(args: &SearchArgs, ctx: &AppContext) -> Result<()> {
    let query = NoteQuery {
        text: args.query.clone(),
        tags: args.tags.clone(),
        date_from: args
            .from
            .as_deref()
            .map(|s| parse_datetime_arg(s, false))
            .transpose()?,
        date_to: args
            .to
            .as_deref()
            .map(|s| parse_datetime_arg(s, true))
            .transpose()?,
        kind: parse_kind(args.kind.as_deref())?,
        sort_by: match args.sort {
            SortField::Title => SortBy::Title,
            SortField::Created => SortBy::CreatedAt,
            SortField::Updated => SortBy::UpdatedAt,
        },
        sort_order: match args.order {
            Order::Asc => SortOrder::Asc,
            Order::Desc => SortOrder::Desc,
        },
    };

    let engine = SearchEngine::new(&ctx.notes);
    let results = engine.search(&query);
    ctx.stats.record(StatEvent::Search);

    print_note_listings(&results, args.format)
}
