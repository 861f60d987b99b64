use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ScoreOutcome;

/// Database row for matches table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub team1: String,
    pub team2: String,
    pub match_date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A match together with its betting outcomes, in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct MatchWithOutcomes {
    #[serde(flatten)]
    pub fixture: Match,
    pub betting_outcomes: Vec<ScoreOutcome>,
}
