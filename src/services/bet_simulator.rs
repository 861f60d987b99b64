use std::sync::Arc;

use metrics::counter;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::bet_repo;
use crate::models::{ScoreOutcome, SimulatedBet};
use crate::services::rate_cache::RateCache;

/// Largest amount a single notification may claim (the BCH supply cap).
const MAX_AMOUNT_BCH: Decimal = Decimal::from_parts(21_000_000, 0, 0, false, 0);
/// Satoshi precision.
const MAX_AMOUNT_SCALE: u32 = 8;
const MAX_REFERENCE_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("outcome not found: {0}")]
    UnknownOutcome(String),

    #[error("payment reference '{reference}' already recorded for outcome {outcome_id}")]
    DuplicateReference { outcome_id: Uuid, reference: String },

    #[error("invalid bet: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of a successful simulation: the new bet and the outcome as it
/// stands after the bet's tickets were added.
#[derive(Debug, Clone)]
pub struct SimulationReceipt {
    pub bet: SimulatedBet,
    pub outcome: ScoreOutcome,
}

/// Records simulated payment notifications against score outcomes.
///
/// Each (outcome, payment reference) pair is recorded at most once. The
/// guarantee comes from the unique constraint on `simulated_bets`, so it
/// holds across concurrent requests and across process instances.
#[derive(Clone)]
pub struct BetSimulator {
    pool: PgPool,
    rates: Arc<RateCache>,
    ticket_value_usd: Decimal,
}

impl BetSimulator {
    pub fn new(pool: PgPool, rates: Arc<RateCache>, ticket_value_usd: Decimal) -> Self {
        Self {
            pool,
            rates,
            ticket_value_usd,
        }
    }

    pub async fn simulate(
        &self,
        outcome_id: &str,
        amount: Decimal,
        payment_reference: &str,
    ) -> Result<SimulationReceipt, SimulationError> {
        let Ok(outcome_uuid) = Uuid::parse_str(outcome_id.trim()) else {
            counter!("unknown_outcome_total").increment(1);
            return Err(SimulationError::UnknownOutcome(outcome_id.to_string()));
        };

        let rate = self.rates.current_rate().await;

        let mut tx = self.pool.begin().await?;

        // An unknown outcome is reported as such whatever else is wrong
        // with the notification.
        if bet_repo::find_outcome(&mut tx, outcome_uuid).await?.is_none() {
            counter!("unknown_outcome_total").increment(1);
            return Err(SimulationError::UnknownOutcome(outcome_id.to_string()));
        }

        validate_amount(amount)?;
        let reference = validate_reference(payment_reference)?;
        let tickets = tickets_for(amount, rate, self.ticket_value_usd);

        let Some(bet) = bet_repo::insert_bet_if_new(
            &mut tx,
            outcome_uuid,
            amount,
            reference,
            tickets,
            rate,
        )
        .await?
        else {
            // Dropping `tx` rolls back; nothing was written.
            counter!("duplicate_bet_references_total").increment(1);
            tracing::info!(
                outcome_id = %outcome_uuid,
                payment_reference = reference,
                "Duplicate payment notification ignored"
            );
            return Err(SimulationError::DuplicateReference {
                outcome_id: outcome_uuid,
                reference: reference.to_string(),
            });
        };

        let outcome = bet_repo::add_tickets(&mut tx, outcome_uuid, tickets).await?;
        tx.commit().await?;

        counter!("simulated_bets_total").increment(1);
        tracing::info!(
            bet_id = %bet.id,
            outcome_id = %outcome.id,
            score = %outcome.score,
            amount_bch = %bet.amount_bch,
            tickets,
            "Simulated bet recorded"
        );

        Ok(SimulationReceipt { bet, outcome })
    }
}

/// Whole tickets bought by `amount_bch` at `rate` USD per BCH, with each
/// ticket costing `ticket_value_usd`. Zero when no usable rate is known,
/// `i64::MAX` when the count does not fit.
pub fn tickets_for(amount_bch: Decimal, rate: Option<Decimal>, ticket_value_usd: Decimal) -> i64 {
    let Some(rate) = rate.filter(|r| *r > Decimal::ZERO) else {
        return 0;
    };
    if ticket_value_usd <= Decimal::ZERO || amount_bch <= Decimal::ZERO {
        return 0;
    }

    amount_bch
        .checked_mul(rate)
        .and_then(|usd| usd.checked_div(ticket_value_usd))
        .map(|t| t.floor())
        .and_then(|t| t.to_i64())
        .unwrap_or(i64::MAX)
}

fn validate_amount(amount: Decimal) -> Result<(), SimulationError> {
    if amount <= Decimal::ZERO {
        return Err(SimulationError::InvalidRequest("amount must be positive".into()));
    }
    if amount > MAX_AMOUNT_BCH {
        return Err(SimulationError::InvalidRequest(format!(
            "amount exceeds {MAX_AMOUNT_BCH} BCH"
        )));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(SimulationError::InvalidRequest(format!(
            "amount has more than {MAX_AMOUNT_SCALE} decimal places"
        )));
    }
    Ok(())
}

fn validate_reference(reference: &str) -> Result<&str, SimulationError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(SimulationError::InvalidRequest(
            "payment_reference must not be empty".into(),
        ));
    }
    if trimmed.len() > MAX_REFERENCE_LEN {
        return Err(SimulationError::InvalidRequest(format!(
            "payment_reference longer than {MAX_REFERENCE_LEN} bytes"
        )));
    }
    Ok(trimmed)
}
