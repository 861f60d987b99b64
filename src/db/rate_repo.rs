use sqlx::PgPool;

use crate::models::RateSnapshot;

/// Append a fetched rate to the history table.
pub async fn insert_rate(pool: &PgPool, snapshot: &RateSnapshot) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO bch_rates (rate, fetched_at) VALUES ($1, $2)")
        .bind(snapshot.rate)
        .bind(snapshot.fetched_at)
        .execute(pool)
        .await?;

    Ok(())
}

/// The most recently fetched rate, if any was ever stored.
pub async fn latest_rate(pool: &PgPool) -> anyhow::Result<Option<RateSnapshot>> {
    let row = sqlx::query_as::<_, RateSnapshot>(
        "SELECT rate, fetched_at FROM bch_rates ORDER BY fetched_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// The N most recent rates, newest first.
pub async fn recent_rates(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<RateSnapshot>> {
    let rows = sqlx::query_as::<_, RateSnapshot>(
        "SELECT rate, fetched_at FROM bch_rates ORDER BY fetched_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
