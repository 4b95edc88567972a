//! Core business logic abstractions

pub mod calendar;
pub mod clock;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rate;
pub mod resolver;

// Re-export main types for cleaner imports
pub use calendar::CalendarGateway;
pub use clock::{Clock, FixedClock, ResolutionContext, SystemClock};
pub use currency::Currency;
pub use error::UpstreamUnavailable;
pub use rate::{CachedRate, RateGateway, RateObservation, RateStore};
pub use resolver::{RateResolver, RateSource, Resolution};
