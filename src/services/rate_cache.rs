use std::sync::Arc;
use std::time::Instant;

use chrono::{SubsecRound, Utc};
use metrics::{counter, gauge, histogram};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{RateReading, RateSnapshot};
use crate::oracle::PriceSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateError {
    #[error("BCH rate not available")]
    NoRateAvailable,
}

/// Holds the most recent BCH/USD snapshot fetched from a [`PriceSource`].
///
/// Reads never touch the network. A failed refresh leaves the previous
/// snapshot in place, so readers keep getting the last good value (which
/// ages) rather than an error.
pub struct RateCache {
    source: Arc<dyn PriceSource>,
    current: RwLock<Option<RateSnapshot>>,
}

impl RateCache {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
        }
    }

    /// Install a snapshot without fetching, e.g. the last persisted rate at
    /// startup. Ignored if the cache already holds a newer one.
    pub async fn seed(&self, snapshot: RateSnapshot) {
        let mut current = self.current.write().await;
        match *current {
            Some(existing) if existing.fetched_at >= snapshot.fetched_at => {}
            _ => *current = Some(snapshot),
        }
    }

    /// Fetch a fresh rate and swap it in. Returns the new snapshot, or `None`
    /// if the fetch failed (the failure is logged, the old snapshot is kept).
    pub async fn refresh(&self) -> Option<RateSnapshot> {
        let started = Instant::now();
        let result = self.source.fetch_bch_usd().await;
        histogram!("rate_fetch_latency_seconds").record(started.elapsed().as_secs_f64());

        match result {
            Ok(rate) => {
                // Microseconds, matching what Postgres stores.
                let snapshot = RateSnapshot::new(rate, Utc::now().trunc_subsecs(6));
                *self.current.write().await = Some(snapshot);

                counter!("rate_refresh_total").increment(1);
                gauge!("bch_usd_rate").set(rate.to_f64().unwrap_or(0.0));
                tracing::info!(source = self.source.name(), rate = %rate, "BCH/USD rate updated");

                Some(snapshot)
            }
            Err(e) => {
                counter!("rate_refresh_failures_total").increment(1);
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    "BCH rate refresh failed, keeping previous snapshot"
                );
                None
            }
        }
    }

    /// Current rate and its age.
    pub async fn get_rate(&self) -> Result<RateReading, RateError> {
        let snapshot = (*self.current.read().await).ok_or(RateError::NoRateAvailable)?;
        Ok(RateReading {
            snapshot,
            age: snapshot.age_at(Utc::now()),
        })
    }

    pub async fn current_rate(&self) -> Option<Decimal> {
        self.current.read().await.map(|s| s.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::PriceSourceError;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed script of fetch results; `None` entries fail.
    struct ScriptedSource {
        script: Mutex<VecDeque<Option<Decimal>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<Decimal>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_bch_usd(&self) -> Result<Decimal, PriceSourceError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .flatten()
                .ok_or(PriceSourceError::MissingRate)
        }
    }

    #[tokio::test]
    async fn test_no_rate_before_first_success() {
        let cache = RateCache::new(ScriptedSource::new(vec![None]));
        assert_eq!(cache.get_rate().await, Err(RateError::NoRateAvailable));

        assert!(cache.refresh().await.is_none());
        assert_eq!(cache.get_rate().await, Err(RateError::NoRateAvailable));
        assert_eq!(cache.current_rate().await, None);
    }

    #[tokio::test]
    async fn test_first_success_is_fresh() {
        let rate = Decimal::new(25000, 2); // 250.00
        let cache = RateCache::new(ScriptedSource::new(vec![Some(rate)]));

        let snapshot = cache.refresh().await.expect("refresh should succeed");
        assert_eq!(snapshot.rate, rate);

        let reading = cache.get_rate().await.unwrap();
        assert_eq!(reading.rate(), rate);
        assert!(reading.age < Duration::seconds(2));
        assert!(!reading.is_stale(Duration::seconds(60)));
    }

    #[tokio::test]
    async fn test_failures_keep_last_success() {
        let sequences: Vec<Vec<Option<Decimal>>> = vec![
            vec![Some(Decimal::from(100)), None],
            vec![Some(Decimal::from(100)), None, None, Some(Decimal::from(120)), None],
            vec![None, Some(Decimal::from(90)), Some(Decimal::from(95))],
            vec![None, None, Some(Decimal::new(31415, 2))],
        ];

        for script in sequences {
            let expected = script.iter().rev().find_map(|r| *r);
            let calls = script.len();
            let cache = RateCache::new(ScriptedSource::new(script));

            for _ in 0..calls {
                cache.refresh().await;
            }

            assert_eq!(cache.get_rate().await.unwrap().rate(), expected.unwrap());
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_does_not_touch_timestamp() {
        let cache = RateCache::new(ScriptedSource::new(vec![Some(Decimal::from(200)), None]));

        let first = cache.refresh().await.unwrap();
        cache.refresh().await;

        let reading = cache.get_rate().await.unwrap();
        assert_eq!(reading.snapshot, first);
    }

    #[tokio::test]
    async fn test_seed_keeps_newer_snapshot() {
        let cache = RateCache::new(ScriptedSource::new(vec![Some(Decimal::from(300))]));
        cache.refresh().await;

        let old = RateSnapshot::new(Decimal::from(150), Utc::now() - Duration::hours(1));
        cache.seed(old).await;
        assert_eq!(cache.current_rate().await, Some(Decimal::from(300)));
    }

    #[tokio::test]
    async fn test_seed_reports_age() {
        let cache = RateCache::new(ScriptedSource::new(vec![]));
        let fetched_at = Utc::now() - Duration::minutes(10);
        cache.seed(RateSnapshot::new(Decimal::from(180), fetched_at)).await;

        let reading = cache.get_rate().await.unwrap();
        assert_eq!(reading.rate(), Decimal::from(180));
        assert!(reading.age >= Duration::minutes(10));
        assert!(reading.is_stale(Duration::minutes(5)));
    }
}
