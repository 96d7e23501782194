//! Conservation checks over settled rounds.
//!
//! Per round:
//!
//! - seller filled == buyer filled == traded quantity
//! - Σ seller balance Δ + Σ buyer balance Δ + spread surplus == 0
//! - filled + remaining == original for every participant, and only filled
//!   participants change balance
//!
//! A violation means the settlement arithmetic is wrong, never that the
//! input was bad, so it is reported as [`AuctionError::InvariantViolation`].
//! [`InvariantTracker`] accumulates the checks across many rounds.

use std::collections::HashMap;

use tracing::warn;

use crate::engine::RoundOutcome;
use crate::error::{AuctionError, Invariant, Result};
use crate::types::{Clearing, Participant, Side};

/// Aggregates of one round (or many, when accumulated)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTotals {
    pub seller_filled: u64,
    pub buyer_filled: u64,
    /// Sum of seller balance changes (fixed-point)
    pub seller_delta: i128,
    /// Sum of buyer balance changes (fixed-point)
    pub buyer_delta: i128,
    /// Spread retained by the market (fixed-point)
    pub surplus: i128,
}

impl RoundTotals {
    fn accumulate(&mut self, other: &RoundTotals) {
        self.seller_filled = self.seller_filled.saturating_add(other.seller_filled);
        self.buyer_filled = self.buyer_filled.saturating_add(other.buyer_filled);
        self.seller_delta += other.seller_delta;
        self.buyer_delta += other.buyer_delta;
        self.surplus += other.surplus;
    }
}

fn violation(round: u64, invariant: Invariant, detail: String) -> AuctionError {
    AuctionError::InvariantViolation { round, invariant, detail }
}

/// Check a settled round given its before/after participants and clearing
pub fn check_round(
    round_id: u64,
    before: &[Participant],
    after: &[Participant],
    clearing: &Clearing,
) -> Result<RoundTotals> {
    let original: HashMap<u64, &Participant> = before.iter().map(|p| (p.id, p)).collect();
    if original.len() != after.len() {
        return Err(violation(
            round_id,
            Invariant::ParticipantQuantity,
            format!("{} participants before, {} after", original.len(), after.len()),
        ));
    }

    let mut totals = RoundTotals::default();
    for participant in after {
        let Some(start) = original.get(&participant.id) else {
            return Err(violation(
                round_id,
                Invariant::ParticipantQuantity,
                format!("participant {} appeared during the round", participant.id),
            ));
        };

        let accounted = participant.filled_quantity.checked_add(participant.quantity);
        if accounted != Some(start.quantity) {
            return Err(violation(
                round_id,
                Invariant::ParticipantQuantity,
                format!(
                    "participant {}: filled {} + remaining {} != original {}",
                    participant.id, participant.filled_quantity, participant.quantity, start.quantity
                ),
            ));
        }

        let delta = participant.balance as i128 - start.balance as i128;
        if participant.filled_quantity == 0 && delta != 0 {
            return Err(violation(
                round_id,
                Invariant::BalanceConservation,
                format!("participant {} changed balance by {delta} without a fill", participant.id),
            ));
        }

        match participant.side()? {
            Side::Sell => {
                totals.seller_filled = totals.seller_filled.saturating_add(participant.filled_quantity);
                totals.seller_delta += delta;
            }
            Side::Buy => {
                totals.buyer_filled = totals.buyer_filled.saturating_add(participant.filled_quantity);
                totals.buyer_delta += delta;
            }
        }
    }

    let traded = clearing.traded_quantity();
    if totals.seller_filled != totals.buyer_filled || totals.seller_filled != traded {
        return Err(violation(
            round_id,
            Invariant::FilledQuantity,
            format!(
                "sellers filled {}, buyers filled {}, traded {traded}",
                totals.seller_filled, totals.buyer_filled
            ),
        ));
    }

    if let Some(result) = clearing.result() {
        totals.surplus = result
            .spread_surplus()
            .ok_or(AuctionError::Overflow { context: "spread surplus" })? as i128;
    }
    if totals.seller_delta + totals.buyer_delta + totals.surplus != 0 {
        return Err(violation(
            round_id,
            Invariant::BalanceConservation,
            format!(
                "seller delta {} + buyer delta {} + surplus {} != 0",
                totals.seller_delta, totals.buyer_delta, totals.surplus
            ),
        ));
    }

    Ok(totals)
}

/// Check an engine outcome
pub fn check_outcome(outcome: &RoundOutcome) -> Result<RoundTotals> {
    check_round(outcome.round_id, &outcome.before, &outcome.participants, &outcome.clearing)
}

/// Cross-round accumulator
#[derive(Debug, Default)]
pub struct InvariantTracker {
    rounds: u64,
    traded: u64,
    totals: RoundTotals,
    violations: Vec<AuctionError>,
}

impl InvariantTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one round and fold it into the running totals
    ///
    /// Violations are kept (see [`InvariantTracker::violations`]) and also
    /// returned.
    pub fn record(&mut self, outcome: &RoundOutcome) -> Result<()> {
        self.rounds += 1;
        match check_outcome(outcome) {
            Ok(totals) => {
                self.traded = self.traded.saturating_add(outcome.clearing.traded_quantity());
                self.totals.accumulate(&totals);
                Ok(())
            }
            Err(err) => {
                warn!(round_id = outcome.round_id, error = %err, "invariant violation");
                self.violations.push(err.clone());
                Err(err)
            }
        }
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Units traded over all clean rounds
    pub fn traded(&self) -> u64 {
        self.traded
    }

    pub fn totals(&self) -> &RoundTotals {
        &self.totals
    }

    pub fn violations(&self) -> &[AuctionError] {
        &self.violations
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
