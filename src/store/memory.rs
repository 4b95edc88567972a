use crate::core::{CachedRate, Currency, RateObservation, RateStore};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate store backed by a Vec behind a Mutex
#[derive(Clone, Default)]
pub struct MemoryRateStore {
    rows: Arc<Mutex<Vec<CachedRate>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row in append order.
    pub async fn rows(&self) -> Vec<CachedRate> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn latest(&self, from: Currency, to: Currency) -> Result<Option<CachedRate>> {
        let rows = self.rows.lock().await;
        let latest = rows
            .iter()
            .filter(|row| row.from == from && row.to == to)
            .max_by_key(|row| (row.date, row.id))
            .cloned();
        if latest.is_some() {
            debug!("Store HIT for {}/{}", from, to);
        } else {
            debug!("Store MISS for {}/{}", from, to);
        }
        Ok(latest)
    }

    async fn append(&self, observation: &RateObservation) -> Result<CachedRate> {
        let mut rows = self.rows.lock().await;
        let id = rows.iter().map(|row| row.id).max().map_or(1, |id| id + 1);
        let row = CachedRate::from_observation(id, observation);
        debug!(id, date = %row.date, "Store APPEND for {}/{}", row.from, row.to);
        rows.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_latest_on_empty_store() {
        let store = MemoryRateStore::new();
        assert!(
            store
                .latest(Currency::Usd, Currency::Eur)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_latest_is_by_publication_date() {
        let store = MemoryRateStore::new();
        store
            .append(&RateObservation::new(Currency::Usd, Currency::Eur, date(10), 0.85))
            .await
            .unwrap();
        store
            .append(&RateObservation::new(Currency::Usd, Currency::Eur, date(8), 0.83))
            .await
            .unwrap();

        let latest = store
            .latest(Currency::Usd, Currency::Eur)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.date, date(10));
        assert_eq!(latest.value, 0.85);
        assert_eq!(latest.id, 1);
    }

    #[tokio::test]
    async fn test_same_date_prefers_last_appended() {
        let store = MemoryRateStore::new();
        store
            .append(&RateObservation::new(Currency::Usd, Currency::Eur, date(10), 0.85))
            .await
            .unwrap();
        let second = store
            .append(&RateObservation::new(Currency::Usd, Currency::Eur, date(10), 0.86))
            .await
            .unwrap();

        let latest = store
            .latest(Currency::Usd, Currency::Eur)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest, second);
    }

    #[tokio::test]
    async fn test_pairs_are_isolated() {
        let store = MemoryRateStore::new();
        store
            .append(&RateObservation::new(Currency::Usd, Currency::Eur, date(10), 0.85))
            .await
            .unwrap();

        assert!(
            store
                .latest(Currency::Eur, Currency::Usd)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.rows().await.len(), 1);
    }
}
