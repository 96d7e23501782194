//! One side of a round's book.
//!
//! ## Design
//!
//! A `SortedBook` holds `(slab key, limit price)` entries. The participant
//! data itself stays in the [`Round`] slab, so sorting never touches a
//! participant field.
//!
//! ## Ordering
//!
//! ```text
//! sellers: lowest ask  -> highest ask
//! buyers:  highest bid -> lowest bid
//! ```
//!
//! Equal prices keep their arrival order (the sort is stable).

use crate::book::Round;
use crate::error::{AuctionError, Result};
use crate::types::Side;

/// A book entry: which participant, at what limit price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    /// Slab key into the round
    pub key: usize,
    /// Ask for sellers, bid for buyers (fixed-point)
    pub price: u64,
}

/// Entries of one side, in priority order once sorted
#[derive(Debug, Clone)]
pub struct SortedBook {
    side: Side,
    entries: Vec<BookEntry>,
}

impl SortedBook {
    /// Create an empty book for `side`
    pub fn new(side: Side) -> Self {
        Self {
            side,
            entries: Vec::new(),
        }
    }

    /// Append an entry (arrival order)
    pub fn push(&mut self, key: usize, price: u64) {
        self.entries.push(BookEntry { key, price });
    }

    /// Sort into priority order: asks ascending, bids descending, stable on ties
    pub fn sort(&mut self) {
        match self.side {
            Side::Sell => self.entries.sort_by(|a, b| a.price.cmp(&b.price)),
            Side::Buy => self.entries.sort_by(|a, b| b.price.cmp(&a.price)),
        }
    }

    /// Check the book is in priority order
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| match self.side {
            Side::Sell => pair[0].price <= pair[1].price,
            Side::Buy => pair[0].price >= pair[1].price,
        })
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    /// Limit price at position `index`
    #[inline]
    pub fn price_at(&self, index: usize) -> Option<u64> {
        self.entries.get(index).map(|entry| entry.price)
    }

    /// Slab keys in book order
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Slab keys of positions `0..=through` (clamped to the book length)
    pub fn keys_through(&self, through: usize) -> impl Iterator<Item = usize> + '_ {
        self.keys().take(through.saturating_add(1))
    }

    /// Sum of remaining quantity over positions `0..=through`
    pub fn cumulative_quantity(&self, round: &Round, through: usize) -> Result<u64> {
        self.keys_through(through)
            .filter_map(|key| round.get(key))
            .try_fold(0u64, |sum, participant| {
                sum.checked_add(participant.quantity).ok_or(AuctionError::Overflow {
                    context: "cumulative book quantity",
                })
            })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
