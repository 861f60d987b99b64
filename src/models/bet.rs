use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for simulated_bets table. No funds move; the row only
/// records the intent carried by a payment notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SimulatedBet {
    pub id: Uuid,
    pub outcome_id: Uuid,
    pub amount_bch: Decimal,
    pub payment_reference: String,
    pub num_tickets: i64,
    pub rate_used: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}
