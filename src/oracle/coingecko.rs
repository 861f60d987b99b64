use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{PriceSource, PriceSourceError};

pub const COINGECKO_SIMPLE_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

const COIN_ID: &str = "bitcoin-cash";
const VS_CURRENCY: &str = "usd";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    url: String,
}

impl CoinGeckoClient {
    pub fn new(url: impl Into<String>) -> Result<Self, PriceSourceError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_bch_usd(&self) -> Result<Decimal, PriceSourceError> {
        let body: Value = self
            .http
            .get(&self.url)
            .query(&[("ids", COIN_ID), ("vs_currencies", VS_CURRENCY)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_simple_price(&body)
    }
}

/// Extract the rate from a `/simple/price` body such as
/// `{"bitcoin-cash":{"usd":251.37}}`.
///
/// The number is parsed from its JSON text so no precision is lost to `f64`.
pub fn parse_simple_price(body: &Value) -> Result<Decimal, PriceSourceError> {
    let raw = body
        .get(COIN_ID)
        .and_then(|coin| coin.get(VS_CURRENCY))
        .ok_or(PriceSourceError::MissingRate)?;

    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => return Err(PriceSourceError::MissingRate),
        other => return Err(PriceSourceError::InvalidRate(other.to_string())),
    };

    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| PriceSourceError::InvalidRate(text.clone()))?;

    if rate <= Decimal::ZERO {
        return Err(PriceSourceError::InvalidRate(text));
    }

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_float_rate() {
        let body = json!({ "bitcoin-cash": { "usd": 251.37 } });
        assert_eq!(parse_simple_price(&body).unwrap(), Decimal::new(25137, 2));
    }

    #[test]
    fn test_parse_integer_rate() {
        let body = json!({ "bitcoin-cash": { "usd": 250 } });
        assert_eq!(parse_simple_price(&body).unwrap(), Decimal::from(250));
    }

    #[test]
    fn test_missing_coin_is_error() {
        let body = json!({ "bitcoin": { "usd": 60000 } });
        assert!(matches!(
            parse_simple_price(&body),
            Err(PriceSourceError::MissingRate)
        ));
    }

    #[test]
    fn test_null_rate_is_missing() {
        let body = json!({ "bitcoin-cash": { "usd": null } });
        assert!(matches!(
            parse_simple_price(&body),
            Err(PriceSourceError::MissingRate)
        ));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let body = json!({ "bitcoin-cash": { "usd": 0 } });
        assert!(matches!(
            parse_simple_price(&body),
            Err(PriceSourceError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_non_numeric_rate_rejected() {
        let body = json!({ "bitcoin-cash": { "usd": "abc" } });
        assert!(matches!(
            parse_simple_price(&body),
            Err(PriceSourceError::InvalidRate(_))
        ));
    }
}
