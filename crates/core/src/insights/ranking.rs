//! Popularity ranking providers for vendor statistics.
//!
//! The "top percent buyer" figure shown next to each vendor has no real data
//! behind it. Keeping it behind [`PopularityRanker`] lets the grouping logic be
//! tested without touching randomness.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A ranking value guaranteed to lie in `1..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PopularityRank(u8);

impl PopularityRank {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::RankOutOfRange { value })
        }
    }

    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PopularityRank {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PopularityRank> for u8 {
    fn from(value: PopularityRank) -> Self {
        value.0
    }
}

impl fmt::Display for PopularityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait PopularityRanker: Send + Sync {
    fn rank(&self, vendor: &str, count: u32) -> PopularityRank;
}

impl<R: PopularityRanker + ?Sized> PopularityRanker for Box<R> {
    fn rank(&self, vendor: &str, count: u32) -> PopularityRank {
        (**self).rank(vendor, count)
    }
}

impl<R: PopularityRanker + ?Sized> PopularityRanker for &R {
    fn rank(&self, vendor: &str, count: u32) -> PopularityRank {
        (**self).rank(vendor, count)
    }
}

/// Uniform draw from `1..=100` per call, independent of the vendor and count.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomRanker;

impl PopularityRanker for RandomRanker {
    fn rank(&self, _vendor: &str, _count: u32) -> PopularityRank {
        let value = rand::thread_rng().gen_range(PopularityRank::MIN..=PopularityRank::MAX);
        PopularityRank::clamped(value)
    }
}

/// Reproducible ranks derived from a seed and the vendor label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededRanker {
    seed: u64,
}

impl SeededRanker {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl PopularityRanker for SeededRanker {
    fn rank(&self, vendor: &str, _count: u32) -> PopularityRank {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(vendor.as_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest.as_bytes()[..8]);
        let bucket = u64::from_le_bytes(word) % u64::from(PopularityRank::MAX);

        // bucket < 100, so the narrowing is lossless.
        PopularityRank::clamped(bucket as u8 + PopularityRank::MIN)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedRanker {
    rank: PopularityRank,
}

impl FixedRanker {
    pub fn new(value: u8) -> Self {
        Self { rank: PopularityRank::clamped(value) }
    }
}

impl PopularityRanker for FixedRanker {
    fn rank(&self, _vendor: &str, _count: u32) -> PopularityRank {
        self.rank
    }
}
