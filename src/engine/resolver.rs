//! Clearing-point resolution over sorted books.
//!
//! ## Algorithm
//!
//! Walk both books pairwise from [`FIRST_CROSS_INDEX`] and stop at the first
//! index `i` where the ask meets the bid (`ask >= bid`). With
//! `mid = (ask[i] + bid[i]) / 2`:
//!
//! - `ask[i-1] < mid < bid[i-1]`: marginal index `i-1`, both sides at `mid`
//! - otherwise: marginal index `i-2`, sellers at `ask[i-1]`, buyers at
//!   `bid[i-1]` (the spread stays with the market); no trade when `i == 1`
//!
//! If the shorter book runs out first, [`ExhaustionPolicy`] decides.

use tracing::debug;

use crate::book::SortedBook;
use crate::config::ExhaustionPolicy;
use crate::types::price::midpoint;
use crate::types::NoTradeReason;

/// First index tested for a cross. Index 0 is never tested, so at least one
/// matched pair precedes any crossing point.
pub const FIRST_CROSS_INDEX: usize = 1;

/// Marginal index and prices, before quantity allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearingPoint {
    pub marginal_index: usize,
    pub sell_price: u64,
    pub buy_price: u64,
}

/// Resolver output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Clear(ClearingPoint),
    NoTrade(NoTradeReason),
}

/// An ask meets or exceeds a bid: no profitable trade between them
#[inline]
pub fn crosses(ask: u64, bid: u64) -> bool {
    ask >= bid
}

/// Strictly between `low` and `high`
#[inline]
fn strictly_between(low: u64, value: u64, high: u64) -> bool {
    low < value && value < high
}

/// Find the clearing point of sorted books
pub fn resolve(sellers: &SortedBook, buyers: &SortedBook, policy: ExhaustionPolicy) -> Resolution {
    let (Some(best_ask), Some(best_bid)) = (sellers.price_at(0), buyers.price_at(0)) else {
        return Resolution::NoTrade(NoTradeReason::EmptyBook);
    };
    if crosses(best_ask, best_bid) {
        return Resolution::NoTrade(NoTradeReason::NoOverlap);
    }

    let depth = sellers.len().min(buyers.len());
    let ask = |i: usize| sellers.entries()[i].price;
    let bid = |i: usize| buyers.entries()[i].price;

    for i in FIRST_CROSS_INDEX..depth {
        if !crosses(ask(i), bid(i)) {
            continue;
        }

        let mid = midpoint(ask(i), bid(i));
        debug!(index = i, ask = ask(i), bid = bid(i), mid, "books cross");

        if strictly_between(ask(i - 1), mid, bid(i - 1)) {
            return Resolution::Clear(ClearingPoint {
                marginal_index: i - 1,
                sell_price: mid,
                buy_price: mid,
            });
        }
        return match i.checked_sub(2) {
            Some(marginal_index) => Resolution::Clear(ClearingPoint {
                marginal_index,
                sell_price: ask(i - 1),
                buy_price: bid(i - 1),
            }),
            None => Resolution::NoTrade(NoTradeReason::NoMarginalPair),
        };
    }

    debug!(depth, ?policy, "shorter book exhausted without a cross");
    match policy {
        ExhaustionPolicy::NoTrade => Resolution::NoTrade(NoTradeReason::BooksExhausted),
        ExhaustionPolicy::ClearAtLastPair => {
            let last = depth - 1;
            let mid = midpoint(ask(last), bid(last));
            Resolution::Clear(ClearingPoint {
                marginal_index: last,
                sell_price: mid,
                buy_price: mid,
            })
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
