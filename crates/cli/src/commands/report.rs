use minishop_core::config::AppConfig;
use minishop_core::{DefaultInsightsRuntime, InsightsInput, InsightsRuntime};
use tracing::info;

use crate::commands::{load_feed_for, CommandResult, FeedOptions};
use crate::render;

const COMMAND: &str = "report";

pub fn run(config: &AppConfig, options: &FeedOptions) -> CommandResult {
    let feed = match load_feed_for(COMMAND, &options.feed_path) {
        Ok(feed) => feed,
        Err(result) => return result,
    };

    let runtime = DefaultInsightsRuntime::from_config(config);
    let report = runtime.evaluate(InsightsInput {
        products: feed.products.as_deref(),
        orders: feed.orders.as_deref(),
    });

    info!(
        event_name = "cli.report.completed",
        vendor_count = report.vendors.len(),
        total_bought = report.purchases.total_bought,
        "insights report ready"
    );

    if options.json {
        CommandResult::success_with_data(COMMAND, "insights report generated", &report)
    } else {
        CommandResult::text(format!(
            "{}\n\n{}",
            render::vendors(&report.vendors),
            render::purchases(&report.purchases, &config.insights.currency_code)
        ))
    }
}
