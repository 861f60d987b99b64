use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for score_outcomes table.
///
/// `score` is unique per match. `bet_count` is the number of tickets
/// recorded against this outcome across all simulated bets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreOutcome {
    pub id: Uuid,
    pub match_id: Uuid,
    pub score: String,
    pub bch_address: Option<String>,
    pub bet_count: i64,
    #[serde(skip)]
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
}
