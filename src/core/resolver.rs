//! Resolution of the best known rate for a currency pair.
//!
//! Tiers are evaluated in order and each either answers or falls through:
//!
//! 1. `Cache` - the stored rate is already dated today.
//! 2. `SameDay` - today is a bank day, the cutoff has passed and the
//!    upstream has published today's rate.
//! 3. `PastWeek` - the most recent rate published in the last seven days,
//!    provided it is newer than the stored one.
//! 4. `StaleCache` - whatever the store holds, however old.
//!
//! If no tier answers the rate is `NotAvailable`. Upstream failures never
//! escape `resolve`.

use crate::core::calendar::CalendarGateway;
use crate::core::clock::{Clock, ResolutionContext};
use crate::core::currency::Currency;
use crate::core::rate::{CachedRate, RateGateway, RateObservation, RateStore};
use chrono::NaiveDate;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Cache,
    SameDay,
    PastWeek,
    StaleCache,
}

impl Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateSource::Cache => "cache",
                RateSource::SameDay => "same day",
                RateSource::PastWeek => "past week",
                RateSource::StaleCache => "stale cache",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found {
        observation: RateObservation,
        source: RateSource,
    },
    NotAvailable,
}

impl Resolution {
    fn found(observation: RateObservation, source: RateSource) -> Self {
        Resolution::Found {
            observation,
            source,
        }
    }

    pub fn observation(&self) -> Option<&RateObservation> {
        match self {
            Resolution::Found { observation, .. } => Some(observation),
            Resolution::NotAvailable => None,
        }
    }

    pub fn source(&self) -> Option<RateSource> {
        match self {
            Resolution::Found { source, .. } => Some(*source),
            Resolution::NotAvailable => None,
        }
    }
}

const TIERS: [RateSource; 4] = [
    RateSource::Cache,
    RateSource::SameDay,
    RateSource::PastWeek,
    RateSource::StaleCache,
];

/// Everything a tier needs to decide, computed once per call.
struct Attempt<'a> {
    from: Currency,
    to: Currency,
    ctx: &'a ResolutionContext,
    cached: Option<&'a CachedRate>,
}

pub struct RateResolver {
    calendar: Arc<dyn CalendarGateway>,
    gateway: Arc<dyn RateGateway>,
    store: Arc<dyn RateStore>,
    clock: Arc<dyn Clock>,
}

impl RateResolver {
    pub fn new(
        calendar: Arc<dyn CalendarGateway>,
        gateway: Arc<dyn RateGateway>,
        store: Arc<dyn RateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calendar,
            gateway,
            store,
            clock,
        }
    }

    #[instrument(name = "ResolveRate", skip_all, fields(from = %from, to = %to))]
    pub async fn resolve(&self, from: Currency, to: Currency) -> Resolution {
        let ctx = ResolutionContext::now(self.clock.as_ref());
        debug!(today = %ctx.today, time = %ctx.current_time, "Resolving rate");

        let cached = match self.store.latest(from, to).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Failed to read cached rate, continuing without it");
                None
            }
        };

        let attempt = Attempt {
            from,
            to,
            ctx: &ctx,
            cached: cached.as_ref(),
        };

        for tier in TIERS {
            let answer = match tier {
                RateSource::Cache => self.cached_today(&attempt),
                RateSource::SameDay => self.same_day(&attempt).await,
                RateSource::PastWeek => self.past_week(&attempt).await,
                RateSource::StaleCache => attempt.cached.map(CachedRate::observation),
            };
            if let Some(observation) = answer {
                info!(source = %tier, date = %observation.date, value = observation.value, "Resolved rate");
                return Resolution::found(observation, tier);
            }
            debug!(tier = %tier, "Tier produced no rate");
        }

        info!("No rate available");
        Resolution::NotAvailable
    }

    fn cached_today(&self, attempt: &Attempt<'_>) -> Option<RateObservation> {
        attempt
            .cached
            .filter(|cached| cached.date == attempt.ctx.today)
            .map(CachedRate::observation)
    }

    async fn same_day(&self, attempt: &Attempt<'_>) -> Option<RateObservation> {
        if !attempt.ctx.is_after_cutoff() {
            debug!("Before cutoff, skipping same day fetch");
            return None;
        }
        if !self.is_bank_day(attempt).await {
            debug!("Not a bank day, skipping same day fetch");
            return None;
        }

        let observations = self
            .fetch(attempt.from, attempt.to, attempt.ctx.today)
            .await;
        let observation = observations.into_iter().next()?;
        self.save(&observation).await;
        Some(observation)
    }

    async fn past_week(&self, attempt: &Attempt<'_>) -> Option<RateObservation> {
        let observations = self
            .fetch(attempt.from, attempt.to, attempt.ctx.past_week_start())
            .await;
        let candidate = observations.into_iter().max_by_key(|o| o.date)?;

        if let Some(cached) = attempt.cached {
            if candidate.date <= cached.date {
                debug!(
                    candidate = %candidate.date,
                    cached = %cached.date,
                    "Past week rate is not newer than cached rate"
                );
                return None;
            }
        }

        self.save(&candidate).await;
        Some(candidate)
    }

    /// Uncertain bank day status counts as not a bank day.
    async fn is_bank_day(&self, attempt: &Attempt<'_>) -> bool {
        match self.calendar.is_bank_day(attempt.ctx.today).await {
            Ok(is_bank_day) => is_bank_day,
            Err(e) => {
                warn!(error = %e, "Calendar lookup failed, assuming not a bank day");
                false
            }
        }
    }

    async fn fetch(
        &self,
        from: Currency,
        to: Currency,
        start: NaiveDate,
    ) -> Vec<RateObservation> {
        match self.gateway.fetch_from(from, to, start).await {
            Ok(observations) => {
                debug!(count = observations.len(), start = %start, "Fetched observations");
                observations
            }
            Err(e) => {
                warn!(error = %e, start = %start, "Rate fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn save(&self, observation: &RateObservation) {
        if let Err(e) = self.store.append(observation).await {
            warn!(error = %e, date = %observation.date, "Failed to store rate");
        }
    }
}
