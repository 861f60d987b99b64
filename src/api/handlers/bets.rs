use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ws_types::{BetRecordedData, WsMessage};
use crate::db::{bet_repo, match_repo};
use crate::errors::AppError;
use crate::models::{ScoreOutcome, SimulatedBet};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SimulateBetRequest {
    pub outcome_id: String,
    pub amount: Decimal,
    pub payment_reference: String,
}

#[derive(Debug, Serialize)]
pub struct SimulateBetResponse {
    pub bet_id: Uuid,
    pub match_id: Uuid,
    pub outcome_id: Uuid,
    pub score: String,
    pub num_tickets: i64,
}

#[derive(Debug, Serialize)]
pub struct OutcomeBetsResponse {
    pub outcome: ScoreOutcome,
    pub bets: Vec<SimulatedBet>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/simulate-bet/: record a simulated payment notification
pub async fn simulate(
    State(state): State<AppState>,
    payload: Result<Json<SimulateBetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SimulateBetResponse>>), AppError> {
    let Json(body) = payload?;
    let receipt = state
        .simulator
        .simulate(&body.outcome_id, body.amount, &body.payment_reference)
        .await?;

    let bet = &receipt.bet;
    let outcome = &receipt.outcome;

    let _ = state.ws_tx.send(WsMessage::BetRecorded(BetRecordedData {
        bet_id: bet.id,
        match_id: outcome.match_id,
        outcome_id: outcome.id,
        score: outcome.score.clone(),
        amount_bch: bet.amount_bch,
        num_tickets: bet.num_tickets,
        bet_count: outcome.bet_count,
        payment_reference: bet.payment_reference.clone(),
    }));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SimulateBetResponse {
            bet_id: bet.id,
            match_id: outcome.match_id,
            outcome_id: outcome.id,
            score: outcome.score.clone(),
            num_tickets: bet.num_tickets,
        })),
    ))
}

/// GET /api/bets/: recorded simulated bets, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<SimulatedBet>>>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);
    let bets = bet_repo::list_bets(&state.db, limit).await?;
    Ok(Json(ApiResponse::ok(bets)))
}

/// GET /api/outcomes/{id}/bets/: one outcome and the bets recorded on it
pub async fn for_outcome(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OutcomeBetsResponse>>, AppError> {
    let not_found = || AppError::NotFound("outcome not found".into());

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let outcome = match_repo::get_outcome(&state.db, id)
        .await?
        .ok_or_else(not_found)?;
    let bets = bet_repo::get_bets_for_outcome(&state.db, id).await?;

    Ok(Json(ApiResponse::ok(OutcomeBetsResponse { outcome, bets })))
}
