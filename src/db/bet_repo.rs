use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{ScoreOutcome, SimulatedBet};

// The first three run inside the simulator's transaction, so they take a
// connection and surface raw sqlx errors.

pub async fn find_outcome(
    conn: &mut PgConnection,
    outcome_id: Uuid,
) -> Result<Option<ScoreOutcome>, sqlx::Error> {
    sqlx::query_as::<_, ScoreOutcome>("SELECT * FROM score_outcomes WHERE id = $1")
        .bind(outcome_id)
        .fetch_optional(conn)
        .await
}

/// Insert a bet unless one already exists for (outcome, reference).
/// Returns `None` when the pair was already recorded.
pub async fn insert_bet_if_new(
    conn: &mut PgConnection,
    outcome_id: Uuid,
    amount_bch: Decimal,
    payment_reference: &str,
    num_tickets: i64,
    rate_used: Option<Decimal>,
) -> Result<Option<SimulatedBet>, sqlx::Error> {
    sqlx::query_as::<_, SimulatedBet>(
        r#"
        INSERT INTO simulated_bets (outcome_id, amount_bch, payment_reference, num_tickets, rate_used)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (outcome_id, payment_reference) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(outcome_id)
    .bind(amount_bch)
    .bind(payment_reference)
    .bind(num_tickets)
    .bind(rate_used)
    .fetch_optional(conn)
    .await
}

/// Add tickets to an outcome's running count and return the updated row.
/// The count saturates at the BIGINT maximum instead of overflowing.
pub async fn add_tickets(
    conn: &mut PgConnection,
    outcome_id: Uuid,
    tickets: i64,
) -> Result<ScoreOutcome, sqlx::Error> {
    sqlx::query_as::<_, ScoreOutcome>(
        r#"
        UPDATE score_outcomes
        SET bet_count = LEAST(bet_count::numeric + $2, 9223372036854775807)::bigint
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(outcome_id)
    .bind(tickets)
    .fetch_one(conn)
    .await
}

/// Most recent bets, newest first.
pub async fn list_bets(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<SimulatedBet>> {
    let rows = sqlx::query_as::<_, SimulatedBet>(
        "SELECT * FROM simulated_bets ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All bets recorded against one outcome, oldest first.
pub async fn get_bets_for_outcome(
    pool: &PgPool,
    outcome_id: Uuid,
) -> anyhow::Result<Vec<SimulatedBet>> {
    let rows = sqlx::query_as::<_, SimulatedBet>(
        "SELECT * FROM simulated_bets WHERE outcome_id = $1 ORDER BY created_at",
    )
    .bind(outcome_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
