use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::RateSnapshot;

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "rate_update")]
    RateUpdate(RateSnapshot),

    #[serde(rename = "bet_recorded")]
    BetRecorded(BetRecordedData),
}

#[derive(Debug, Clone, Serialize)]
pub struct BetRecordedData {
    pub bet_id: Uuid,
    pub match_id: Uuid,
    pub outcome_id: Uuid,
    pub score: String,
    pub amount_bch: Decimal,
    pub num_tickets: i64,
    pub bet_count: i64,
    pub payment_reference: String,
}
