use minishop_core::config::AppConfig;
use minishop_core::DefaultInsightsRuntime;
use tracing::info;

use crate::commands::{load_feed_for, CommandResult, FeedOptions};
use crate::render;

const COMMAND: &str = "vendors";

pub fn run(config: &AppConfig, options: &FeedOptions) -> CommandResult {
    let feed = match load_feed_for(COMMAND, &options.feed_path) {
        Ok(feed) => feed,
        Err(result) => return result,
    };

    let runtime = DefaultInsightsRuntime::from_config(config);
    let stats = runtime.vendors().aggregate(feed.products.as_deref());

    info!(
        event_name = "cli.vendors.completed",
        vendor_count = stats.len(),
        ranking_mode = ?config.ranking.mode,
        "vendor statistics ready"
    );

    if options.json {
        CommandResult::success_with_data(
            COMMAND,
            format!("{} vendor(s) aggregated", stats.len()),
            &stats,
        )
    } else {
        CommandResult::text(render::vendors(&stats))
    }
}
