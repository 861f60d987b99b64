use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::match_repo::{self, NewOutcome};
use crate::models::MatchWithOutcomes;

/// Scores offered on every seeded match.
pub const COMMON_SCORES: [&str; 10] = [
    "0-0", "1-0", "0-1", "1-1", "2-0", "0-2", "2-1", "1-2", "2-2", "3-0",
];

/// (home, away, days from today)
const DEMO_FIXTURES: [(&str, &str, i64); 3] = [
    ("Flamengo", "Corinthians", 0),
    ("Palmeiras", "São Paulo", 1),
    ("Grêmio", "Internacional", 3),
];

/// Seed the demo fixtures when the matches table is empty.
/// Returns the number of matches created.
pub async fn seed_if_empty(pool: &PgPool) -> anyhow::Result<usize> {
    if match_repo::count_matches(pool).await? > 0 {
        tracing::debug!("Matches already present, skipping fixture seeding");
        return Ok(0);
    }

    let created = seed_demo_fixtures(pool).await?;
    Ok(created.len())
}

/// Create the demo matches unconditionally. Every outcome of every match
/// gets its own receiving address.
pub async fn seed_demo_fixtures(pool: &PgPool) -> anyhow::Result<Vec<MatchWithOutcomes>> {
    let today = midnight_utc(Utc::now());
    let mut created = Vec::with_capacity(DEMO_FIXTURES.len());

    for (team1, team2, days) in DEMO_FIXTURES {
        let fixture = match_repo::create_match(
            pool,
            team1,
            team2,
            today + Duration::days(days),
            &outcomes_for(&COMMON_SCORES),
        )
        .await?;

        tracing::info!(
            match_id = %fixture.fixture.id,
            team1,
            team2,
            outcomes = fixture.betting_outcomes.len(),
            "Seeded match"
        );
        created.push(fixture);
    }

    Ok(created)
}

/// Build outcome rows for `scores`, each with its own placeholder address.
pub fn outcomes_for(scores: &[&str]) -> Vec<NewOutcome> {
    scores
        .iter()
        .map(|score| NewOutcome {
            score: (*score).to_string(),
            bch_address: Some(placeholder_address()),
        })
        .collect()
}

/// A unique, clearly fake cashaddr-style receiving address. Nothing is ever
/// sent to it.
pub fn placeholder_address() -> String {
    format!("bitcoincash:qq{}", Uuid::new_v4().simple())
}

fn midnight_utc(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::default()).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_placeholder_address_shape() {
        let addr = placeholder_address();
        assert!(addr.starts_with("bitcoincash:qq"));
        let suffix = &addr["bitcoincash:qq".len()..];
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_outcomes_have_unique_scores_and_addresses() {
        let outcomes = outcomes_for(&COMMON_SCORES);
        assert_eq!(outcomes.len(), COMMON_SCORES.len());

        let scores: HashSet<_> = outcomes.iter().map(|o| o.score.as_str()).collect();
        assert_eq!(scores.len(), outcomes.len());

        let addresses: HashSet<_> = outcomes.iter().filter_map(|o| o.bch_address.clone()).collect();
        assert_eq!(addresses.len(), outcomes.len());
    }

    #[test]
    fn test_midnight_utc() {
        let t = DateTime::parse_from_rfc3339("2025-03-14T15:09:26Z").unwrap().with_timezone(&Utc);
        assert_eq!(midnight_utc(t).to_rfc3339(), "2025-03-14T00:00:00+00:00");
    }
}
