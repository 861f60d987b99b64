use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Match, MatchWithOutcomes, ScoreOutcome};

/// An outcome to create alongside a match.
#[derive(Debug, Clone)]
pub struct NewOutcome {
    pub score: String,
    pub bch_address: Option<String>,
}

/// Create a match and its outcomes in one transaction. Outcome order is
/// preserved. Fails if two outcomes share a score.
pub async fn create_match(
    pool: &PgPool,
    team1: &str,
    team2: &str,
    match_date: DateTime<Utc>,
    outcomes: &[NewOutcome],
) -> anyhow::Result<MatchWithOutcomes> {
    let mut tx = pool.begin().await?;

    let fixture = sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches (team1, team2, match_date)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(team1)
    .bind(team2)
    .bind(match_date)
    .fetch_one(&mut *tx)
    .await?;

    let mut betting_outcomes = Vec::with_capacity(outcomes.len());
    for (position, outcome) in outcomes.iter().enumerate() {
        let row = sqlx::query_as::<_, ScoreOutcome>(
            r#"
            INSERT INTO score_outcomes (match_id, score, bch_address, position)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(fixture.id)
        .bind(&outcome.score)
        .bind(outcome.bch_address.as_deref())
        .bind(position as i32)
        .fetch_one(&mut *tx)
        .await?;
        betting_outcomes.push(row);
    }

    tx.commit().await?;

    Ok(MatchWithOutcomes {
        fixture,
        betting_outcomes,
    })
}

pub async fn count_matches(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM matches")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// All matches ordered by kickoff, each with its outcomes.
pub async fn list_matches_with_outcomes(pool: &PgPool) -> anyhow::Result<Vec<MatchWithOutcomes>> {
    let matches = sqlx::query_as::<_, Match>("SELECT * FROM matches ORDER BY match_date, id")
        .fetch_all(pool)
        .await?;

    let ids: Vec<Uuid> = matches.iter().map(|m| m.id).collect();
    let outcomes = sqlx::query_as::<_, ScoreOutcome>(
        "SELECT * FROM score_outcomes WHERE match_id = ANY($1) ORDER BY match_id, position",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_match: HashMap<Uuid, Vec<ScoreOutcome>> = HashMap::new();
    for outcome in outcomes {
        by_match.entry(outcome.match_id).or_default().push(outcome);
    }

    Ok(matches
        .into_iter()
        .map(|fixture| MatchWithOutcomes {
            betting_outcomes: by_match.remove(&fixture.id).unwrap_or_default(),
            fixture,
        })
        .collect())
}

pub async fn get_match_with_outcomes(
    pool: &PgPool,
    match_id: Uuid,
) -> anyhow::Result<Option<MatchWithOutcomes>> {
    let Some(fixture) = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
        .bind(match_id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let betting_outcomes = sqlx::query_as::<_, ScoreOutcome>(
        "SELECT * FROM score_outcomes WHERE match_id = $1 ORDER BY position",
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(MatchWithOutcomes {
        fixture,
        betting_outcomes,
    }))
}

pub async fn get_outcome(pool: &PgPool, outcome_id: Uuid) -> anyhow::Result<Option<ScoreOutcome>> {
    let row = sqlx::query_as::<_, ScoreOutcome>("SELECT * FROM score_outcomes WHERE id = $1")
        .bind(outcome_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}
