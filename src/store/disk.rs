use crate::core::{CachedRate, Currency, RateObservation, RateStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

const NEXT_ID_KEY: &str = "next_id";

/// Rate store persisted in a fjall keyspace.
///
/// Rows are keyed `FROM/TO/YYYY-MM-DD/id` so a reverse prefix scan over a
/// pair yields the latest publication date first, and for equal dates the
/// most recently appended row.
pub struct FjallRateStore {
    keyspace: Keyspace,
    rates: PartitionHandle,
    meta: PartitionHandle,
    write_lock: Mutex<()>,
}

impl FjallRateStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path.join("rates_db"))
            .open()
            .with_context(|| format!("Failed to open rate store at {}", path.display()))?;
        let rates = keyspace.open_partition("rates", PartitionCreateOptions::default())?;
        let meta = keyspace.open_partition("meta", PartitionCreateOptions::default())?;
        debug!("Opened rate store at {}", path.display());

        Ok(Self {
            keyspace,
            rates,
            meta,
            write_lock: Mutex::new(()),
        })
    }

    fn pair_prefix(from: Currency, to: Currency) -> String {
        format!("{}/{}/", from.code(), to.code())
    }

    fn row_key(row: &CachedRate) -> String {
        format!(
            "{}{}/{:020}",
            Self::pair_prefix(row.from, row.to),
            row.date.format("%Y-%m-%d"),
            row.id
        )
    }

    fn next_id(&self) -> Result<u64> {
        match self.meta.get(NEXT_ID_KEY)? {
            Some(value) => {
                let bytes = <[u8; 8]>::try_from(&value[..]).context("Corrupt id counter")?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(1),
        }
    }
}

#[async_trait]
impl RateStore for FjallRateStore {
    async fn latest(&self, from: Currency, to: Currency) -> Result<Option<CachedRate>> {
        let prefix = Self::pair_prefix(from, to);
        match self.rates.prefix(prefix.as_bytes()).next_back() {
            Some(entry) => {
                let (_, value) = entry?;
                let row: CachedRate =
                    serde_json::from_slice(&value).context("Failed to decode cached rate")?;
                debug!(id = row.id, date = %row.date, "Store HIT for {}/{}", from, to);
                Ok(Some(row))
            }
            None => {
                debug!("Store MISS for {}/{}", from, to);
                Ok(None)
            }
        }
    }

    async fn append(&self, observation: &RateObservation) -> Result<CachedRate> {
        let _guard = self.write_lock.lock().await;

        let id = self.next_id()?;
        let row = CachedRate::from_observation(id, observation);

        let mut batch = self.keyspace.batch();
        batch.insert(
            &self.rates,
            Self::row_key(&row).into_bytes(),
            serde_json::to_vec(&row)?,
        );
        batch.insert(&self.meta, NEXT_ID_KEY.as_bytes(), (id + 1).to_be_bytes().to_vec());
        batch.commit().context("Failed to write cached rate")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist rate store")?;

        debug!(id, date = %row.date, "Store APPEND for {}/{}", row.from, row.to);
        Ok(row)
    }
}
