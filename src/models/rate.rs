use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A BCH/USD rate as fetched from the price oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RateSnapshot {
    pub rate: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(rate: Decimal, fetched_at: DateTime<Utc>) -> Self {
        Self { rate, fetched_at }
    }

    /// Age relative to `now`. Clamped at zero for snapshots stamped in the future.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).max(Duration::zero())
    }
}

/// What readers of the rate cache get back: the cached value and how old it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateReading {
    pub snapshot: RateSnapshot,
    pub age: Duration,
}

impl RateReading {
    pub fn rate(&self) -> Decimal {
        self.snapshot.rate
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age > max_age
    }
}
