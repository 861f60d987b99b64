pub mod coingecko;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

pub use coingecko::CoinGeckoClient;

#[derive(Debug, Error)]
pub enum PriceSourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate missing from response")]
    MissingRate,

    #[error("invalid rate: {0}")]
    InvalidRate(String),
}

/// An external BCH/USD price oracle.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the current BCH price in USD. Implementations must only return
    /// strictly positive rates.
    async fn fetch_bch_usd(&self) -> Result<Decimal, PriceSourceError>;
}
