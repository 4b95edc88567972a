//! Rate observations, the cached rows derived from them, and the
//! collaborators that produce and persist them.

use crate::core::currency::Currency;
use crate::core::error::UpstreamResult;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One published exchange rate for a currency pair on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub from: Currency,
    pub to: Currency,
    pub date: NaiveDate,
    pub value: f64,
}

impl RateObservation {
    pub fn new(from: Currency, to: Currency, date: NaiveDate, value: f64) -> Self {
        Self {
            from,
            to,
            date,
            value,
        }
    }
}

/// A persisted observation. `date` is the publication date of `value`, not
/// the time the row was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRate {
    pub id: u64,
    pub from: Currency,
    pub to: Currency,
    pub date: NaiveDate,
    pub value: f64,
}

impl CachedRate {
    pub fn from_observation(id: u64, observation: &RateObservation) -> Self {
        Self {
            id,
            from: observation.from,
            to: observation.to,
            date: observation.date,
            value: observation.value,
        }
    }

    pub fn observation(&self) -> RateObservation {
        RateObservation::new(self.from, self.to, self.date, self.value)
    }
}

#[async_trait]
pub trait RateGateway: Send + Sync {
    /// Returns every published observation for the pair from `start`
    /// onwards. No ordering is guaranteed.
    async fn fetch_from(
        &self,
        from: Currency,
        to: Currency,
        start: NaiveDate,
    ) -> UpstreamResult<Vec<RateObservation>>;
}

/// Append-only store of resolved observations.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Most recent row for the pair by publication date, ties broken by the
    /// most recently appended row.
    async fn latest(&self, from: Currency, to: Currency) -> Result<Option<CachedRate>>;

    async fn append(&self, observation: &RateObservation) -> Result<CachedRate>;
}
