use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::db::match_repo;
use crate::errors::AppError;
use crate::models::MatchWithOutcomes;
use crate::AppState;

use super::ApiResponse;

/// GET /api/matches/: all matches by kickoff, with outcomes
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MatchWithOutcomes>>>, AppError> {
    let matches = match_repo::list_matches_with_outcomes(&state.db).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

/// GET /api/matches/{id}/: one match with outcomes
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MatchWithOutcomes>>, AppError> {
    let not_found = || AppError::NotFound("match not found".into());

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let fixture = match_repo::get_match_with_outcomes(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(ApiResponse::ok(fixture)))
}
