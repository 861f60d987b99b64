use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::rate_repo;
use crate::errors::AppError;
use crate::models::RateSnapshot;
use crate::AppState;

use super::ApiResponse;

const HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
    pub age_secs: i64,
    pub stale: bool,
}

/// GET /api/bch-rate/: cached rate; 503 until the first successful fetch
pub async fn current(State(state): State<AppState>) -> Result<Json<ApiResponse<RateResponse>>, AppError> {
    let reading = state.rates.get_rate().await?;
    let stale_after = Duration::seconds(state.config.rate_stale_after_secs);

    Ok(Json(ApiResponse::ok(RateResponse {
        rate: reading.rate(),
        timestamp: reading.snapshot.fetched_at,
        age_secs: reading.age.num_seconds(),
        stale: reading.is_stale(stale_after),
    })))
}

/// GET /api/bch-rate/history/: persisted snapshots, newest first
pub async fn history(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RateSnapshot>>>, AppError> {
    let rows = rate_repo::recent_rates(&state.db, HISTORY_LIMIT).await?;
    Ok(Json(ApiResponse::ok(rows)))
}
