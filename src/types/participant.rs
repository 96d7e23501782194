//! Participants and the single order each one submits per round.
//!
//! A participant is a seller XOR a buyer for the round: exactly one of
//! `ask` and `bid` is set. Anything else is rejected with
//! [`AuctionError::MalformedOrder`] before the round enters the pipeline.

use crate::error::{AuctionError, MalformedReason, Result};

// ============================================================================
// Side enum
// ============================================================================

/// Order side
///
/// Represented as u8 in SSZ records:
/// - Sell = 0
/// - Buy = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Ask - wants to sell
    Sell,
    /// Bid - wants to buy
    Buy,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Sell => 0,
            Side::Buy => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Sell),
            1 => Some(Side::Buy),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Sell => Side::Buy,
            Side::Buy => Side::Sell,
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// One participant's side, limit price and quantity for a round.
///
/// Only constructed from a valid [`Participant`], so it always has a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub side: Side,
    /// Limit price (fixed-point, scaled by 10^8)
    pub price: u64,
    /// Whole units
    pub quantity: u64,
}

// ============================================================================
// Participant
// ============================================================================

/// A round participant.
///
/// ## Example
///
/// ```
/// use double_auction::types::{Participant, Side};
/// use double_auction::types::price::{from_units, balance_from_units};
///
/// let seller = Participant::seller(1, "VNO1", balance_from_units(10_000), from_units(10), 5);
/// assert_eq!(seller.side().unwrap(), Side::Sell);
/// assert_eq!(seller.limit_price(), Some(from_units(10)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Participant {
    /// Unique within a round
    pub id: u64,

    pub name: String,

    /// Balance in fixed-point (scaled by 10^8); only settlement mutates it
    pub balance: i64,

    /// Minimum acceptable sell price (fixed-point)
    pub ask: Option<u64>,

    /// Maximum acceptable buy price (fixed-point)
    pub bid: Option<u64>,

    /// Units still unfilled
    pub quantity: u64,

    /// Units filled in the last round, set by the reconciler
    pub filled_quantity: u64,
}

impl Participant {
    /// Create a seller
    pub fn seller(id: u64, name: impl Into<String>, balance: i64, ask: u64, quantity: u64) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            ask: Some(ask),
            bid: None,
            quantity,
            filled_quantity: 0,
        }
    }

    /// Create a buyer
    pub fn buyer(id: u64, name: impl Into<String>, balance: i64, bid: u64, quantity: u64) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            ask: None,
            bid: Some(bid),
            quantity,
            filled_quantity: 0,
        }
    }

    /// The participant's side for this round
    ///
    /// # Errors
    ///
    /// [`AuctionError::MalformedOrder`] when both or neither of ask/bid are set.
    pub fn side(&self) -> Result<Side> {
        match (self.ask, self.bid) {
            (Some(_), None) => Ok(Side::Sell),
            (None, Some(_)) => Ok(Side::Buy),
            (Some(_), Some(_)) => Err(AuctionError::MalformedOrder {
                id: self.id,
                reason: MalformedReason::BothSides,
            }),
            (None, None) => Err(AuctionError::MalformedOrder {
                id: self.id,
                reason: MalformedReason::NoSide,
            }),
        }
    }

    /// Validate and extract the round's order
    pub fn order(&self) -> Result<Order> {
        let side = self.side()?;
        let price = match side {
            Side::Sell => self.ask,
            Side::Buy => self.bid,
        };
        Ok(Order {
            side,
            price: price.unwrap_or_default(),
            quantity: self.quantity,
        })
    }

    /// The ask or bid, whichever is set (the ask wins on a malformed participant)
    pub fn limit_price(&self) -> Option<u64> {
        self.ask.or(self.bid)
    }

    /// Check if nothing is left to fill
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Deduct up to `fill_qty` from the unfilled quantity
    ///
    /// # Returns
    ///
    /// The actual quantity deducted (may be less if not enough remains)
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.quantity);
        self.quantity -= actual_fill;
        actual_fill
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
