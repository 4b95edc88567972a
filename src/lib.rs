pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Clock, Currency, FixedClock, RateResolver, RateStore, SystemClock};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    /// Resolve the latest rate for a pair
    Rate {
        from: Currency,
        to: Currency,
        /// Resolve as if the current time were this instant
        at: Option<DateTime<Utc>>,
        /// Use a throwaway in-memory store instead of the persistent one
        no_cache: bool,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("riksfx starting...");

    match command {
        AppCommand::Currencies => {
            println!("{}", cli::currencies::display_currencies());
            Ok(())
        }
        AppCommand::Rate {
            from,
            to,
            at,
            no_cache,
        } => {
            let config = match config_path {
                Some(path) => AppConfig::load_from_path(path)?,
                None => AppConfig::load()?,
            };
            debug!("Loaded config: {config:#?}");

            let resolver = build_resolver(&config, at, no_cache)?;
            cli::rate::display_rate(&resolver, from, to).await
        }
    }
}

pub fn build_resolver(
    config: &AppConfig,
    at: Option<DateTime<Utc>>,
    no_cache: bool,
) -> Result<RateResolver> {
    let riksbank = &config.providers.riksbank;
    let provider = Arc::new(providers::RiksbankProvider::new(
        &riksbank.base_url,
        riksbank.timeout(),
    )?);

    let store: Arc<dyn RateStore> = if no_cache {
        Arc::new(store::MemoryRateStore::new())
    } else {
        Arc::new(store::FjallRateStore::open(&config.data_path()?.join("cache"))?)
    };

    let clock: Arc<dyn Clock> = match at {
        Some(instant) => Arc::new(FixedClock(instant)),
        None => Arc::new(SystemClock),
    };

    Ok(RateResolver::new(provider.clone(), provider, store, clock))
}
