use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::product::{Product, ProductId};
use crate::insights::ranking::{PopularityRank, PopularityRanker, RandomRanker};

pub const FALLBACK_VENDOR_PREFIX: &str = "Mock Vendor ";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorCount {
    pub vendor: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStat {
    pub vendor: String,
    pub count: u32,
    pub top_percent: PopularityRank,
}

/// Vendor label for a product: the explicit vendor when present, otherwise a
/// label derived from the identifier alone.
pub fn resolve_vendor(product: &Product) -> Cow<'_, str> {
    match product.explicit_vendor() {
        Some(vendor) => Cow::Borrowed(vendor),
        None => Cow::Owned(fallback_vendor(&product.id)),
    }
}

pub fn fallback_vendor(id: &ProductId) -> String {
    format!("{FALLBACK_VENDOR_PREFIX}{}", id.residue_mod3() + 1)
}

/// Counts products per resolved vendor, in first-encounter order.
pub fn group_by_vendor<'a, I>(products: I) -> Vec<VendorCount>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut counts: IndexMap<String, u32> = IndexMap::new();
    for product in products {
        let vendor = resolve_vendor(product);
        match counts.get_mut(&*vendor) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                counts.insert(vendor.into_owned(), 1);
            }
        }
    }

    counts.into_iter().map(|(vendor, count)| VendorCount { vendor, count }).collect()
}

pub struct VendorAggregator<R> {
    ranker: R,
}

impl<R> VendorAggregator<R> {
    pub fn new(ranker: R) -> Self {
        Self { ranker }
    }
}

impl Default for VendorAggregator<RandomRanker> {
    fn default() -> Self {
        Self::new(RandomRanker)
    }
}

impl<R: PopularityRanker> VendorAggregator<R> {
    /// Groups products by vendor. A missing collection behaves as an empty one.
    pub fn aggregate(&self, products: Option<&[Product]>) -> Vec<VendorStat> {
        let products = products.unwrap_or_default();
        let stats: Vec<VendorStat> = group_by_vendor(products)
            .into_iter()
            .map(|VendorCount { vendor, count }| {
                let top_percent = self.ranker.rank(&vendor, count);
                VendorStat { vendor, count, top_percent }
            })
            .collect();

        debug!(
            event_name = "insights.vendors.aggregated",
            product_count = products.len(),
            vendor_count = stats.len(),
            "vendor statistics aggregated"
        );
        stats
    }
}
