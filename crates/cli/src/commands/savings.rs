use minishop_core::config::AppConfig;
use minishop_core::OrderDiscountSummarizer;
use tracing::info;

use crate::commands::{load_feed_for, CommandResult, FeedOptions};
use crate::render;

const COMMAND: &str = "savings";

pub fn run(config: &AppConfig, options: &FeedOptions) -> CommandResult {
    let feed = match load_feed_for(COMMAND, &options.feed_path) {
        Ok(feed) => feed,
        Err(result) => return result,
    };

    let summarizer = OrderDiscountSummarizer::new(config.insights.rounding);
    let summary = summarizer.summarize(feed.orders.as_deref());

    info!(
        event_name = "cli.savings.completed",
        total_bought = summary.total_bought,
        total_saved = %summary.total_saved,
        rounding = summarizer.rounding().as_str(),
        "purchase summary ready"
    );

    if options.json {
        CommandResult::success_with_data(
            COMMAND,
            format!("{} discounted line(s)", summary.products.len()),
            &summary,
        )
    } else {
        CommandResult::text(render::purchases(&summary, &config.insights.currency_code))
    }
}
