//! Local JSON feed consumed by the feed-driven commands.
//!
//! The feed holds storefront data that was fetched elsewhere:
//!
//! ```json
//! { "products": [ ... ], "orders": [ ... ] }
//! ```
//!
//! Both keys are optional; a missing or `null` collection is treated as empty
//! by the aggregators.

use std::fs;
use std::path::{Path, PathBuf};

use minishop_core::{Order, Product};
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub products: Option<Vec<Product>>,
    #[serde(default)]
    pub orders: Option<Vec<Order>>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("could not read feed file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse feed file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
}

impl FeedError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "feed_read",
            Self::ParseFile { .. } => "feed_parse",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ReadFile { .. } => 3,
            Self::ParseFile { .. } => 4,
        }
    }
}

pub fn load_feed(path: &Path) -> Result<Feed, FeedError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| FeedError::ReadFile { path: path.to_path_buf(), source })?;

    serde_json::from_str::<Feed>(&raw)
        .map_err(|source| FeedError::ParseFile { path: path.to_path_buf(), source })
}
