use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::api::ws_types::WsMessage;
use crate::db::rate_repo;
use crate::models::RateSnapshot;
use crate::services::rate_cache::RateCache;

/// Run the rate refresh loop. The first tick fires immediately, then every
/// `interval_secs`. Only one refresh is ever in flight.
pub async fn run_rate_refresher(
    cache: Arc<RateCache>,
    pool: PgPool,
    ws_tx: broadcast::Sender<WsMessage>,
    interval_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_secs, "Rate refresher started");

    loop {
        ticker.tick().await;
        refresh_once(&cache, &pool, &ws_tx).await;
    }
}

/// One refresh cycle: fetch into the cache, append to history, notify
/// WebSocket clients. History and broadcast failures never undo the cache
/// update.
pub async fn refresh_once(
    cache: &RateCache,
    pool: &PgPool,
    ws_tx: &broadcast::Sender<WsMessage>,
) -> Option<RateSnapshot> {
    let snapshot = cache.refresh().await?;

    if let Err(e) = rate_repo::insert_rate(pool, &snapshot).await {
        tracing::warn!(error = %e, rate = %snapshot.rate, "Failed to persist BCH rate");
    }

    // No subscribers is not an error.
    let _ = ws_tx.send(WsMessage::RateUpdate(snapshot));

    Some(snapshot)
}
