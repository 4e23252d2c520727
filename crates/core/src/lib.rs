pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;

pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::order::{LineItem, Order, OrderId};
pub use domain::product::{Money, Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use insights::discount::{DiscountedProductEntry, OrderDiscountSummarizer, PurchaseSummary};
pub use insights::money::{format_currency, RoundingPolicy};
pub use insights::ranking::{
    FixedRanker, PopularityRank, PopularityRanker, RandomRanker, SeededRanker,
};
pub use insights::vendor::{resolve_vendor, VendorAggregator, VendorStat};
pub use insights::{DefaultInsightsRuntime, InsightsInput, InsightsReport, InsightsRuntime};
