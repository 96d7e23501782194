//! Engine and generator configuration.
//!
//! ```
//! use double_auction::config::{AuctionConfig, ExhaustionPolicy};
//!
//! let config = AuctionConfig::default()
//!     .with_exhaustion(ExhaustionPolicy::NoTrade)
//!     .with_invariant_checks(false);
//! assert_eq!(config.exhaustion, ExhaustionPolicy::NoTrade);
//! ```

/// What the resolver does when the shorter book runs out before any cross.
///
/// Every compared pair was profitable in that case, so the round can either
/// clear all of them or be treated as having no crossing point at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExhaustionPolicy {
    /// Clear every pair up to the end of the shorter book at the midpoint
    /// of its last ask and bid
    #[default]
    ClearAtLastPair,
    /// No crossing point was found, so nothing trades
    NoTrade,
}

/// Auction engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionConfig {
    pub exhaustion: ExhaustionPolicy,

    /// Run the conservation checks after every round and fail the round on a
    /// violation
    pub verify_invariants: bool,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            exhaustion: ExhaustionPolicy::default(),
            verify_invariants: true,
        }
    }
}

impl AuctionConfig {
    pub fn with_exhaustion(mut self, exhaustion: ExhaustionPolicy) -> Self {
        self.exhaustion = exhaustion;
        self
    }

    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }
}

/// Parameters for [`crate::generator::RandomOrderSource`].
///
/// Prices, balances and quantities are whole units; the generator scales
/// prices and balances to fixed-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Sellers per round (ids 1..=sellers)
    pub sellers: usize,
    /// Buyers per round (ids follow the sellers)
    pub buyers: usize,
    /// Starting balance for every participant
    pub initial_balance: i64,
    /// Asks are drawn from 1..=max_ask
    pub max_ask: u64,
    /// Bids are drawn from 1..=max_bid
    pub max_bid: u64,
    /// Quantities are drawn from 0..=max_quantity
    pub max_quantity: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sellers: 5,
            buyers: 5,
            initial_balance: 10_000,
            max_ask: 100,
            max_bid: 100,
            max_quantity: 1_000,
        }
    }
}

impl GeneratorConfig {
    pub fn with_participants(mut self, sellers: usize, buyers: usize) -> Self {
        self.sellers = sellers;
        self.buyers = buyers;
        self
    }

    pub fn with_price_ceiling(mut self, max_ask: u64, max_bid: u64) -> Self {
        self.max_ask = max_ask;
        self.max_bid = max_bid;
        self
    }

    pub fn with_max_quantity(mut self, max_quantity: u64) -> Self {
        self.max_quantity = max_quantity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuctionConfig::default();
        assert_eq!(config.exhaustion, ExhaustionPolicy::ClearAtLastPair);
        assert!(config.verify_invariants);

        let generator = GeneratorConfig::default();
        assert_eq!((generator.sellers, generator.buyers), (5, 5));
        assert_eq!(generator.initial_balance, 10_000);
    }

    #[test]
    fn test_generator_builders() {
        let generator = GeneratorConfig::default()
            .with_participants(2, 3)
            .with_price_ceiling(50, 60)
            .with_max_quantity(10);
        assert_eq!(generator.sellers, 2);
        assert_eq!(generator.buyers, 3);
        assert_eq!(generator.max_ask, 50);
        assert_eq!(generator.max_bid, 60);
        assert_eq!(generator.max_quantity, 10);
    }
}
