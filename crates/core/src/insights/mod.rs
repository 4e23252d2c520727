pub mod discount;
pub mod money;
pub mod ranking;
pub mod vendor;

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, RankingConfig, RankingMode};
use crate::domain::{order::Order, product::Product};

use self::{
    discount::{OrderDiscountSummarizer, PurchaseSummary},
    money::RoundingPolicy,
    ranking::{FixedRanker, PopularityRank, PopularityRanker, RandomRanker, SeededRanker},
    vendor::{VendorAggregator, VendorStat},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct InsightsInput<'a> {
    pub products: Option<&'a [Product]>,
    pub orders: Option<&'a [Order]>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub vendors: Vec<VendorStat>,
    pub purchases: PurchaseSummary,
}

pub trait InsightsRuntime: Send + Sync {
    fn evaluate(&self, input: InsightsInput<'_>) -> InsightsReport;
}

pub struct DefaultInsightsRuntime<R> {
    vendors: VendorAggregator<R>,
    discounts: OrderDiscountSummarizer,
}

impl<R> DefaultInsightsRuntime<R> {
    pub fn new(ranker: R, rounding: RoundingPolicy) -> Self {
        Self {
            vendors: VendorAggregator::new(ranker),
            discounts: OrderDiscountSummarizer::new(rounding),
        }
    }

    pub fn vendors(&self) -> &VendorAggregator<R> {
        &self.vendors
    }

    pub fn discounts(&self) -> &OrderDiscountSummarizer {
        &self.discounts
    }
}

impl Default for DefaultInsightsRuntime<RandomRanker> {
    fn default() -> Self {
        Self::new(RandomRanker, RoundingPolicy::default())
    }
}

impl DefaultInsightsRuntime<Box<dyn PopularityRanker>> {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ranker_from_config(&config.ranking), config.insights.rounding)
    }
}

/// Builds the ranker selected by `[ranking]`. Expects a validated config;
/// missing values fall back to the seed `0` and the rank `100`.
pub fn ranker_from_config(ranking: &RankingConfig) -> Box<dyn PopularityRanker> {
    match ranking.mode {
        RankingMode::Random => Box::new(RandomRanker),
        RankingMode::Seeded => Box::new(SeededRanker::new(ranking.seed.unwrap_or_default())),
        RankingMode::Fixed => {
            Box::new(FixedRanker::new(ranking.fixed_value.unwrap_or(PopularityRank::MAX)))
        }
    }
}

impl<R> InsightsRuntime for DefaultInsightsRuntime<R>
where
    R: PopularityRanker,
{
    fn evaluate(&self, input: InsightsInput<'_>) -> InsightsReport {
        InsightsReport {
            vendors: self.vendors.aggregate(input.products),
            purchases: self.discounts.summarize(input.orders),
        }
    }
}
