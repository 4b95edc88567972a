//! Wall-clock handling for the Stockholm publication cutoff

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Zone in which rates are published and the cutoff is evaluated.
pub const TIME_ZONE: Tz = chrono_tz::Europe::Stockholm;

/// Local time of day (16:15) from which today's published rate is final.
pub const CUTOFF_HOUR: u32 = 16;
pub const CUTOFF_MINUTE: u32 = 15;

/// How far back the fallback query reaches.
pub const PAST_WEEK_DAYS: i64 = 7;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Per-call view of "now" in the publication time zone.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub now_local: DateTime<Tz>,
    pub today: NaiveDate,
    pub current_time: NaiveTime,
}

impl ResolutionContext {
    pub fn at(instant: DateTime<Utc>) -> Self {
        let now_local = instant.with_timezone(&TIME_ZONE);
        Self {
            now_local,
            today: now_local.date_naive(),
            current_time: now_local.time(),
        }
    }

    pub fn now(clock: &dyn Clock) -> Self {
        Self::at(clock.now())
    }

    /// Inclusive: exactly 16:15 counts as after the cutoff.
    pub fn is_after_cutoff(&self) -> bool {
        (self.current_time.hour(), self.current_time.minute()) >= (CUTOFF_HOUR, CUTOFF_MINUTE)
    }

    pub fn past_week_start(&self) -> NaiveDate {
        self.today - Duration::days(PAST_WEEK_DAYS)
    }
}
