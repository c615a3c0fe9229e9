use crate::analysis::{SearchFilters, SearchHit, is_rejected_query};
use crate::api::search;
use crate::cli::SearchArgs;
use crate::style;
use colored::Colorize;

use super::CommandContext;

pub fn cmd_search(args: SearchArgs) -> i32 {
    let ctx = match CommandContext::new(&args.target) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    if is_rejected_query(&args.query) {
        style::error("That looks like an email address, not a file path");
        return 1;
    }

    let result = match ctx.analyze() {
        Ok(result) => result,
        Err(code) => return code,
    };

    let filters = SearchFilters {
        category: args.category,
        extension: args.extension.clone(),
        size: args.size,
        max_results: args.limit.unwrap_or(ctx.config.search.max_results),
    };

    let hits = search(&result, &args.query, &filters);
    if hits.is_empty() {
        style::warning("No files match");
        return 0;
    }

    for hit in &hits {
        println!("{}", format_hit(hit));
    }
    style::section(&format!("{} of {} files", hits.len(), result.files.len()));
    0
}

fn format_hit(hit: &SearchHit) -> String {
    format!(
        "{}  {}  {}",
        format!("{:>5}", hit.score).cyan(),
        hit.file.path,
        format!("({} B)", hit.file.size).dimmed()
    )
}
