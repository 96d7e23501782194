//! One round's participant arena.
//!
//! ## Architecture
//!
//! - **Slab**: participants live in a slab; books refer to them by key
//! - **HashMap**: participant id to slab key, for duplicate detection and lookup
//! - **Arrival list**: slab keys in insertion order, which is the tie-break
//!   order for equal prices
//!
//! Participants are validated on insertion, so everything that reaches
//! [`Round::split`] is a seller XOR a buyer.
//!
//! ## Example
//!
//! ```
//! use double_auction::book::Round;
//! use double_auction::types::Participant;
//!
//! let round = Round::from_participants(vec![
//!     Participant::seller(1, "VNO1", 0, 1_000, 5),
//!     Participant::buyer(2, "VNO2", 0, 2_000, 5),
//! ]).unwrap();
//!
//! let (sellers, buyers) = round.split();
//! assert_eq!(sellers.len(), 1);
//! assert_eq!(buyers.len(), 1);
//! ```

use std::collections::HashMap;
use slab::Slab;

use crate::book::SortedBook;
use crate::error::{AuctionError, Result};
use crate::types::{Participant, Side};

/// Participants of a single round
#[derive(Debug, Default)]
pub struct Round {
    /// Participant storage, keyed by slab index
    participants: Slab<Participant>,

    /// Participant id to slab key
    index: HashMap<u64, usize>,

    /// Slab keys in insertion order
    arrival: Vec<usize>,
}

impl Round {
    /// Create an empty round
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a round with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            participants: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            arrival: Vec::with_capacity(capacity),
        }
    }

    /// Build a round from an externally generated participant list
    ///
    /// # Errors
    ///
    /// The first malformed or duplicate participant, in input order.
    pub fn from_participants(participants: Vec<Participant>) -> Result<Self> {
        let mut round = Self::with_capacity(participants.len());
        for participant in participants {
            round.add_participant(participant)?;
        }
        Ok(round)
    }

    // ========================================================================
    // Participant Management
    // ========================================================================

    /// Add a participant at the end of the arrival order
    ///
    /// # Returns
    ///
    /// The slab key for the added participant
    ///
    /// # Errors
    ///
    /// - [`AuctionError::MalformedOrder`] if both or neither of ask/bid are set
    /// - [`AuctionError::DuplicateParticipant`] if the id is already present
    pub fn add_participant(&mut self, participant: Participant) -> Result<usize> {
        participant.side()?;
        if self.index.contains_key(&participant.id) {
            return Err(AuctionError::DuplicateParticipant { id: participant.id });
        }

        let id = participant.id;
        let key = self.participants.insert(participant);
        self.index.insert(id, key);
        self.arrival.push(key);
        Ok(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Get a participant by slab key
    #[inline]
    pub fn get(&self, key: usize) -> Option<&Participant> {
        self.participants.get(key)
    }

    /// Get a mutable participant by slab key
    #[inline]
    pub fn get_mut(&mut self, key: usize) -> Option<&mut Participant> {
        self.participants.get_mut(key)
    }

    /// Get a participant by id
    pub fn get_by_id(&self, id: u64) -> Option<&Participant> {
        self.index.get(&id).and_then(|&key| self.participants.get(key))
    }

    /// Get the slab key for a participant id
    #[inline]
    pub fn key_of(&self, id: u64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Participants in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.arrival.iter().filter_map(|&key| self.participants.get(key))
    }

    /// Copy of all participants in arrival order (the round's "before" state)
    pub fn snapshot(&self) -> Vec<Participant> {
        self.iter().cloned().collect()
    }

    // ========================================================================
    // Book Splitter
    // ========================================================================

    /// Partition the round into an unsorted seller book and buyer book
    ///
    /// Relative arrival order is preserved within each book.
    pub fn split(&self) -> (SortedBook, SortedBook) {
        let mut sellers = SortedBook::new(Side::Sell);
        let mut buyers = SortedBook::new(Side::Buy);

        for &key in &self.arrival {
            let participant = &self.participants[key];
            match (participant.ask, participant.bid) {
                (Some(ask), None) => sellers.push(key, ask),
                (None, Some(bid)) => buyers.push(key, bid),
                // Rejected by add_participant
                _ => {}
            }
        }

        (sellers, buyers)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, MalformedReason};

    fn mixed_round() -> Round {
        Round::from_participants(vec![
            Participant::buyer(6, "VNO6", 0, 63, 491),
            Participant::seller(1, "VNO1", 0, 98, 182),
            Participant::buyer(7, "VNO7", 0, 69, 179),
            Participant::seller(2, "VNO2", 0, 24, 78),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_new() {
        let round = Round::new();
        assert!(round.is_empty());
        assert_eq!(round.len(), 0);
        let (sellers, buyers) = round.split();
        assert!(sellers.is_empty());
        assert!(buyers.is_empty());
    }

    #[test]
    fn test_split_preserves_arrival_order() {
        let round = mixed_round();
        let (sellers, buyers) = round.split();

        let seller_ids: Vec<u64> = sellers.keys().map(|k| round.get(k).unwrap().id).collect();
        let buyer_ids: Vec<u64> = buyers.keys().map(|k| round.get(k).unwrap().id).collect();
        assert_eq!(seller_ids, vec![1, 2]);
        assert_eq!(buyer_ids, vec![6, 7]);
        assert_eq!(sellers.side(), Side::Sell);
        assert_eq!(buyers.side(), Side::Buy);
    }

    #[test]
    fn test_malformed_participant_rejected() {
        let mut both = Participant::seller(3, "x", 0, 10, 1);
        both.bid = Some(11);

        let err = Round::from_participants(vec![Participant::seller(1, "a", 0, 1, 1), both])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOrder);
        assert_eq!(
            err,
            AuctionError::MalformedOrder { id: 3, reason: MalformedReason::BothSides }
        );
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let mut round = Round::new();
        round.add_participant(Participant::seller(1, "a", 0, 1, 1)).unwrap();

        let err = round.add_participant(Participant::buyer(1, "b", 0, 2, 1)).unwrap_err();
        assert_eq!(err, AuctionError::DuplicateParticipant { id: 1 });
        assert_eq!(round.len(), 1);
    }

    #[test]
    fn test_lookup_by_id() {
        let round = mixed_round();
        assert_eq!(round.get_by_id(7).unwrap().name, "VNO7");
        assert!(round.get_by_id(99).is_none());

        let key = round.key_of(2).unwrap();
        assert_eq!(round.get(key).unwrap().ask, Some(24));
    }

    #[test]
    fn test_snapshot_is_arrival_order() {
        let ids: Vec<u64> = mixed_round().snapshot().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 1, 7, 2]);
    }
}
