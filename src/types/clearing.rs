//! Clearing results and fills for one round.

use crate::types::Side;

/// Where and at what price(s) a round clears.
///
/// ## Price Discovery
///
/// Sellers are paid `sell_price` and buyers pay `buy_price`. The two are
/// equal when the resolver finds an interior midpoint; otherwise they are
/// the marginal ask and bid and the spread is retained by the market.
///
/// ```
/// use double_auction::types::ClearingResult;
///
/// let result = ClearingResult {
///     marginal_index: 0,
///     sell_price: 20,
///     buy_price: 25,
///     quantity: 4,
/// };
/// assert!(!result.is_single_price());
/// assert_eq!(result.spread_surplus(), Some(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearingResult {
    /// Last 0-based index included in the trade on both sides
    pub marginal_index: usize,

    /// Price paid to sellers (fixed-point)
    pub sell_price: u64,

    /// Price charged to buyers (fixed-point)
    pub buy_price: u64,

    /// Units traded
    pub quantity: u64,
}

impl ClearingResult {
    /// Both sides settle at one price
    pub fn is_single_price(&self) -> bool {
        self.sell_price == self.buy_price
    }

    /// Value kept by the market: `quantity × (buy_price − sell_price)`
    ///
    /// Zero for a single clearing price, `None` on overflow.
    pub fn spread_surplus(&self) -> Option<i64> {
        let spread = self.buy_price as i128 - self.sell_price as i128;
        let surplus = spread.checked_mul(self.quantity as i128)?;
        i64::try_from(surplus).ok()
    }
}

/// Why a round produced no trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoTradeReason {
    /// No sellers or no buyers
    EmptyBook,
    /// The best ask already meets or exceeds the best bid
    NoOverlap,
    /// The first cross sits at index 1 and the midpoint test failed,
    /// which leaves no marginal pair
    NoMarginalPair,
    /// The shorter book ran out without a cross under `ExhaustionPolicy::NoTrade`
    BooksExhausted,
    /// A clearing point exists but one side has no units through it
    NoQuantity,
}

/// Outcome of the clearing stages for one round
///
/// `Traded` always carries a non-zero quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearing {
    Traded(ClearingResult),
    NoTrade(NoTradeReason),
}

impl Clearing {
    /// Units traded (0 when there was no trade)
    pub fn traded_quantity(&self) -> u64 {
        match self {
            Clearing::Traded(result) => result.quantity,
            Clearing::NoTrade(_) => 0,
        }
    }

    /// The clearing result, if any
    pub fn result(&self) -> Option<&ClearingResult> {
        match self {
            Clearing::Traded(result) => Some(result),
            Clearing::NoTrade(_) => None,
        }
    }
}

/// One participant's settled fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub participant_id: u64,
    pub side: Side,
    /// Units filled this round
    pub quantity: u64,
    /// Settlement price for this side (fixed-point)
    pub price: u64,
    /// Signed balance change (fixed-point): positive for sellers
    pub balance_delta: i64,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_price_has_no_surplus() {
        let result = ClearingResult {
            marginal_index: 1,
            sell_price: 2_250_000_000,
            buy_price: 2_250_000_000,
            quantity: 8,
        };
        assert!(result.is_single_price());
        assert_eq!(result.spread_surplus(), Some(0));
    }

    #[test]
    fn test_spread_surplus_overflow() {
        let result = ClearingResult {
            marginal_index: 0,
            sell_price: 0,
            buy_price: u64::MAX,
            quantity: u64::MAX,
        };
        assert_eq!(result.spread_surplus(), None);
    }

    #[test]
    fn test_clearing_traded_quantity() {
        assert_eq!(Clearing::NoTrade(NoTradeReason::EmptyBook).traded_quantity(), 0);
        assert!(Clearing::NoTrade(NoTradeReason::NoOverlap).result().is_none());

        let traded = Clearing::Traded(ClearingResult {
            marginal_index: 0,
            sell_price: 1,
            buy_price: 1,
            quantity: 5,
        });
        assert_eq!(traded.traded_quantity(), 5);
    }
}
