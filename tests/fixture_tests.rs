mod common;

use uuid::Uuid;

use bch_betting::services::fixture_loader::{self, COMMON_SCORES};

#[tokio::test]
async fn test_demo_fixtures_get_distinct_addresses() {
    let pool = common::setup_test_db().await;

    let created = fixture_loader::seed_demo_fixtures(&pool).await.unwrap();
    assert_eq!(created.len(), 3);
    for fixture in &created {
        assert_eq!(fixture.betting_outcomes.len(), COMMON_SCORES.len());
    }

    let ids: Vec<Uuid> = created.iter().map(|m| m.fixture.id).collect();
    let (total, distinct): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(DISTINCT bch_address) FROM score_outcomes WHERE match_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(total, 30);
    assert_eq!(distinct, total);
}

#[tokio::test]
async fn test_seed_if_empty_skips_populated_database() {
    let pool = common::setup_test_db().await;
    common::seed_match(&pool, &["0-0"]).await;

    let created = fixture_loader::seed_if_empty(&pool).await.unwrap();
    assert_eq!(created, 0);
}
