//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use cars_types::CurrencyCode;
use currency_rates::MAX_FLUCTUATION_PERCENT;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Currency all stored prices are expressed in.
    pub base_currency: CurrencyCode,
    /// How often the simulated rate service pushes quotes.
    pub rate_push_interval: Duration,
    /// Jitter applied to simulated quotes, in percent. Zero disables it.
    pub rate_fluctuation_percent: f64,
    /// Extra health-check attempts after the first one fails.
    pub rate_healthcheck_retries: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_or(&lookup, "PORT", 8888)?;
        let base_currency = parse_or(&lookup, "BASE_CURRENCY", CurrencyCode::BRL)?;
        let push_secs: u64 = parse_or(&lookup, "RATE_PUSH_INTERVAL_SECS", 5)?;
        let rate_fluctuation_percent: f64 = parse_or(&lookup, "RATE_FLUCTUATION_PERCENT", 1.0)?;
        let rate_healthcheck_retries = parse_or(&lookup, "RATE_HEALTHCHECK_RETRIES", 5)?;

        if push_secs == 0 {
            anyhow::bail!("RATE_PUSH_INTERVAL_SECS must be at least 1");
        }
        if !(0.0..=MAX_FLUCTUATION_PERCENT).contains(&rate_fluctuation_percent) {
            anyhow::bail!(
                "RATE_FLUCTUATION_PERCENT must be between 0 and {}, got {}",
                MAX_FLUCTUATION_PERCENT,
                rate_fluctuation_percent
            );
        }

        Ok(Self {
            port,
            base_currency,
            rate_push_interval: Duration::from_secs(push_secs),
            rate_fluctuation_percent,
            rate_healthcheck_retries,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {} value {:?}", key, raw)),
        _ => Ok(default),
    }
}
