//! Settlement of a clearing result against the round's participants.
//!
//! ## Order of Operations
//!
//! 1. Snapshot the pre-settlement quantity of every participant in
//!    `0..=marginal_index` on both sides
//! 2. Walk buyers in book order, filling `min(remaining, counter)` until the
//!    counter reaches zero; repeat for sellers with a fresh counter
//! 3. Credit sellers `filled × sell_price`, debit buyers `filled × buy_price`
//!
//! Everything before the point where a counter hits zero is fully filled,
//! at most one participant per side is partially filled, and everything
//! after it keeps its full quantity.

use tracing::debug;

use crate::book::{Round, SortedBook};
use crate::error::{AuctionError, Result};
use crate::types::price::notional;
use crate::types::{ClearingResult, Fill, Side};

/// Fills produced by settling one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Sellers in book order, then buyers in book order; zero fills omitted
    pub fills: Vec<Fill>,
}

impl Settlement {
    /// Fills of one side
    pub fn side_fills(&self, side: Side) -> impl Iterator<Item = &Fill> + '_ {
        self.fills.iter().filter(move |fill| fill.side == side)
    }

    /// Total units filled on one side
    pub fn filled(&self, side: Side) -> u64 {
        self.side_fills(side).map(|fill| fill.quantity).sum()
    }

    /// Sum of balance deltas on one side
    pub fn balance_delta(&self, side: Side) -> i128 {
        self.side_fills(side).map(|fill| fill.balance_delta as i128).sum()
    }
}

/// Pre-settlement quantities of `0..=marginal_index`
fn snapshot(round: &Round, book: &SortedBook, marginal_index: usize) -> Vec<(usize, u64)> {
    book.keys_through(marginal_index)
        .filter_map(|key| round.get(key).map(|p| (key, p.quantity)))
        .collect()
}

/// Deduct up to `quantity` units across `matched`, in order
fn allocate(round: &mut Round, matched: &[(usize, u64)], quantity: u64) {
    let mut remaining = quantity;
    for &(key, _) in matched {
        if remaining == 0 {
            break;
        }
        if let Some(participant) = round.get_mut(key) {
            remaining -= participant.fill(remaining);
        }
    }
}

/// Apply balance deltas for one side and record its fills
fn settle_balances(
    round: &mut Round,
    matched: &[(usize, u64)],
    side: Side,
    price: u64,
    fills: &mut Vec<Fill>,
) -> Result<()> {
    for &(key, before) in matched {
        let Some(participant) = round.get_mut(key) else {
            continue;
        };
        let filled = before - participant.quantity;
        if filled == 0 {
            continue;
        }

        let value = notional(filled, price).ok_or(AuctionError::Overflow {
            context: "fill notional",
        })?;
        let balance_delta = match side {
            Side::Sell => value,
            Side::Buy => -value,
        };
        participant.balance = participant
            .balance
            .checked_add(balance_delta)
            .ok_or(AuctionError::Overflow { context: "participant balance" })?;

        fills.push(Fill {
            participant_id: participant.id,
            side,
            quantity: filled,
            price,
            balance_delta,
        });
    }
    Ok(())
}

/// Settle `clearing` against the sorted books
///
/// # Errors
///
/// [`AuctionError::Overflow`] if a fill's value or a resulting balance does
/// not fit. Quantities have already been deducted at that point; the round
/// must be discarded.
pub fn settle(
    round: &mut Round,
    sellers: &SortedBook,
    buyers: &SortedBook,
    clearing: &ClearingResult,
) -> Result<Settlement> {
    let m = clearing.marginal_index;
    let matched_sellers = snapshot(round, sellers, m);
    let matched_buyers = snapshot(round, buyers, m);

    allocate(round, &matched_buyers, clearing.quantity);
    allocate(round, &matched_sellers, clearing.quantity);

    let mut settlement = Settlement::default();
    settle_balances(round, &matched_sellers, Side::Sell, clearing.sell_price, &mut settlement.fills)?;
    settle_balances(round, &matched_buyers, Side::Buy, clearing.buy_price, &mut settlement.fills)?;

    debug!(
        fills = settlement.fills.len(),
        sold = settlement.filled(Side::Sell),
        bought = settlement.filled(Side::Buy),
        "settled round"
    );
    Ok(settlement)
}

// ============================================================================
// Unit Tests
// ============================================================================
