//! Fixed-size SSZ records exchanged with the ledger layer.
//!
//! ## SSZ Layout
//!
//! Both records are fixed-size containers, so a list of records is just
//! their concatenation and can be split back by [`ParticipantRecord::SIZE`]
//! or [`AccountRecord::SIZE`]. Signed balances are stored as their
//! two's-complement `u64` bit pattern because SSZ has no signed integers.
//! Participant names are display-only and are not encoded.

use ssz_rs::prelude::*;

use crate::error::AuctionError;
use crate::types::{Participant, Side};

/// Settled state of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ParticipantRecord {
    pub id: u64,

    /// Side as u8 (0=Sell, 1=Buy)
    pub side_raw: u8,

    /// Ask or bid (fixed-point)
    pub price: u64,

    /// Units still unfilled
    pub quantity: u64,

    pub filled_quantity: u64,

    /// Balance as two's-complement bits of the fixed-point i64
    pub balance_raw: u64,
}

impl ParticipantRecord {
    /// Encoded size: 8+1+8+8+8+8
    pub const SIZE: usize = 41;

    /// Build a record from a valid participant
    pub fn from_participant(participant: &Participant) -> crate::Result<Self> {
        let order = participant.order()?;
        Ok(Self {
            id: participant.id,
            side_raw: order.side.to_u8(),
            price: order.price,
            quantity: participant.quantity,
            filled_quantity: participant.filled_quantity,
            balance_raw: participant.balance as u64,
        })
    }

    pub fn side(&self) -> Option<Side> {
        Side::from_u8(self.side_raw)
    }

    pub fn balance(&self) -> i64 {
        self.balance_raw as i64
    }

    /// Rebuild a participant (with an empty name)
    pub fn to_participant(&self) -> crate::Result<Participant> {
        let side = self
            .side()
            .ok_or_else(|| AuctionError::Codec(format!("invalid side byte {}", self.side_raw)))?;
        let mut participant = match side {
            Side::Sell => Participant::seller(self.id, "", self.balance(), self.price, self.quantity),
            Side::Buy => Participant::buyer(self.id, "", self.balance(), self.price, self.quantity),
        };
        participant.filled_quantity = self.filled_quantity;
        Ok(participant)
    }

    pub fn encode(&self) -> crate::Result<Vec<u8>> {
        ssz_rs::serialize(self).map_err(|e| AuctionError::Codec(format!("{e:?}")))
    }

    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        ssz_rs::deserialize(bytes).map_err(|e| AuctionError::Codec(format!("{e:?}")))
    }
}

/// A ledger account's persisted balance.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct AccountRecord {
    pub id: u64,
    pub balance_raw: u64,
}

impl AccountRecord {
    /// Encoded size: 8+8
    pub const SIZE: usize = 16;

    pub fn new(id: u64, balance: i64) -> Self {
        Self { id, balance_raw: balance as u64 }
    }

    pub fn balance(&self) -> i64 {
        self.balance_raw as i64
    }

    pub fn encode(&self) -> crate::Result<Vec<u8>> {
        ssz_rs::serialize(self).map_err(|e| AuctionError::Codec(format!("{e:?}")))
    }

    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        ssz_rs::deserialize(bytes).map_err(|e| AuctionError::Codec(format!("{e:?}")))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
