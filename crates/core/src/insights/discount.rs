use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::order::Order;
use crate::insights::money::{RoundingPolicy, CURRENCY_SCALE};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountedProductEntry {
    pub name: String,
    pub original_price: Decimal,
    pub discounted_price: Decimal,
    pub saved: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    pub total_bought: u64,
    pub total_saved: Decimal,
    pub products: Vec<DiscountedProductEntry>,
}

impl PurchaseSummary {
    pub fn empty() -> Self {
        Self { total_bought: 0, total_saved: Decimal::new(0, CURRENCY_SCALE), products: Vec::new() }
    }
}

impl Default for PurchaseSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Totals units bought and money saved against compare-at prices.
///
/// Savings accumulate unrounded; only each entry's `saved` and the final
/// `total_saved` are rounded to cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderDiscountSummarizer {
    rounding: RoundingPolicy,
}

impl OrderDiscountSummarizer {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    pub fn summarize(&self, orders: Option<&[Order]>) -> PurchaseSummary {
        let orders = match orders {
            Some(orders) if !orders.is_empty() => orders,
            _ => return PurchaseSummary::empty(),
        };

        let mut total_bought: u64 = 0;
        let mut total_saved = Decimal::ZERO;
        let mut products = Vec::new();

        for item in orders.iter().flat_map(|order| order.line_items.iter()) {
            let Some(product) = item.product.as_ref() else {
                continue;
            };

            let quantity = item.effective_quantity();
            let price = product.price_amount().unwrap_or(Decimal::ZERO);
            let compare_at = product.compare_at_amount().unwrap_or(price);

            total_bought = total_bought.saturating_add(u64::from(quantity));

            if compare_at > price {
                let saved = line_savings(compare_at, price, quantity);
                total_saved = total_saved.checked_add(saved).unwrap_or(Decimal::MAX);
                products.push(DiscountedProductEntry {
                    name: product.title.clone(),
                    original_price: compare_at,
                    discounted_price: price,
                    saved: self.rounding.round(saved),
                });
            }
        }

        let summary = PurchaseSummary {
            total_bought,
            total_saved: self.rounding.round(total_saved),
            products,
        };

        debug!(
            event_name = "insights.purchases.summarized",
            order_count = orders.len(),
            total_bought = summary.total_bought,
            total_saved = %summary.total_saved,
            discounted_lines = summary.products.len(),
            "purchase summary computed"
        );
        summary
    }
}

// Saturates instead of panicking on decimal overflow.
fn line_savings(compare_at: Decimal, price: Decimal, quantity: u32) -> Decimal {
    compare_at
        .checked_sub(price)
        .and_then(|unit| unit.checked_mul(Decimal::from(quantity)))
        .unwrap_or(Decimal::MAX)
}
