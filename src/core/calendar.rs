//! Bank day calendar abstraction

use crate::core::error::UpstreamResult;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Reports whether `date` is a day on which official rates are published.
    async fn is_bank_day(&self, date: NaiveDate) -> UpstreamResult<bool>;
}
