use minishop_core::{format_currency, PurchaseSummary, VendorStat};

pub fn vendors(stats: &[VendorStat]) -> String {
    let mut lines = vec!["Frequently Bought Vendors".to_string()];
    if stats.is_empty() {
        lines.push("No vendor data available.".to_string());
    }
    for stat in stats {
        lines.push(format!(
            "- {} | Products bought: {} | Top {}% buyer",
            stat.vendor, stat.count, stat.top_percent
        ));
    }
    lines.join("\n")
}

pub fn purchases(summary: &PurchaseSummary, currency_code: &str) -> String {
    let mut lines = vec![
        "Your Purchase Summary".to_string(),
        format!("- Products bought: {}", summary.total_bought),
        format!(
            "- Saved with discounts: {}",
            format_currency(summary.total_saved, currency_code)
        ),
    ];

    if summary.products.is_empty() {
        lines.push("No discounted products found in your orders.".to_string());
        return lines.join("\n");
    }

    lines.push("Discounted products:".to_string());
    for entry in &summary.products {
        lines.push(format!(
            "  - {}: {} -> {} (saved {})",
            entry.name,
            format_currency(entry.original_price, currency_code),
            format_currency(entry.discounted_price, currency_code),
            format_currency(entry.saved, currency_code),
        ));
    }
    lines.join("\n")
}
