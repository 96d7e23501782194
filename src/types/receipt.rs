//! Round receipt summarizing one auction round.
//!
//! The receipt carries a state root over the settled participants so two
//! runs of the same input can be compared byte for byte.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::AuctionError;
use crate::types::{Participant, ParticipantRecord};

/// Summary of a settled round.
///
/// ## State Root
///
/// SHA-256 over the SSZ [`ParticipantRecord`]s of the round's final
/// participants, in the order given (the reconciler orders them by id).
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct RoundReceipt {
    /// Round sequence number within the engine
    pub round_id: u64,

    /// Participants in the round
    pub participants: u64,

    /// Participants that received a non-zero fill
    pub fills: u64,

    /// Units traded
    pub traded_quantity: u64,

    /// SHA-256 of the settled participant records
    pub state_root: [u8; 32],
}

impl RoundReceipt {
    pub fn new(
        round_id: u64,
        participants: u64,
        fills: u64,
        traded_quantity: u64,
        state_root: [u8; 32],
    ) -> Self {
        Self {
            round_id,
            participants,
            fills,
            traded_quantity,
            state_root,
        }
    }

    /// Hash the settled participants into a state root
    pub fn compute_state_root(participants: &[Participant]) -> crate::Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        for participant in participants {
            hasher.update(ParticipantRecord::from_participant(participant)?.encode()?);
        }

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hasher.finalize());
        Ok(hash)
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Nothing traded this round
    pub fn is_empty(&self) -> bool {
        self.traded_quantity == 0
    }

    /// Share of participants that received a fill
    ///
    /// Returns None for a round with no participants.
    pub fn fill_rate(&self) -> Option<f64> {
        if self.participants == 0 {
            None
        } else {
            Some(self.fills as f64 / self.participants as f64)
        }
    }

    pub fn encode(&self) -> crate::Result<Vec<u8>> {
        ssz_rs::serialize(self).map_err(|e| AuctionError::Codec(format!("{e:?}")))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
