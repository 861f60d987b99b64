use rust_decimal::Decimal;
use std::env;

use crate::oracle::coingecko::COINGECKO_SIMPLE_PRICE_URL;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Price oracle
    pub price_api_url: String,
    pub rate_refresh_interval_secs: u64,
    /// Snapshots older than this are reported as stale.
    pub rate_stale_after_secs: i64,

    // Betting
    pub ticket_value_usd: Decimal,
    /// Create the demo matches on startup when none exist.
    pub seed_fixtures: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            price_api_url: env::var("PRICE_API_URL")
                .unwrap_or_else(|_| COINGECKO_SIMPLE_PRICE_URL.into()),
            rate_refresh_interval_secs: env::var("RATE_REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
            rate_stale_after_secs: env::var("RATE_STALE_AFTER_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),

            ticket_value_usd: env::var("TICKET_VALUE_USD")
                .unwrap_or_else(|_| "1.00".into())
                .parse::<Decimal>()
                .ok()
                .filter(|v| *v > Decimal::ZERO)
                .unwrap_or(Decimal::ONE),
            seed_fixtures: env::var("SEED_FIXTURES")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
        })
    }
}
