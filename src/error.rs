//! Error types for the auction engine.
//!
//! Every failure is deterministic: re-running a round with the same input
//! reproduces it, so nothing here is retried.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AuctionError>;

/// Coarse classification of [`AuctionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied a participant that is neither a seller nor a buyer (or both)
    MalformedOrder,
    /// Caller supplied the same participant id twice in one round
    DuplicateParticipant,
    /// Settlement broke a conservation law
    InvariantViolation,
    /// Checked fixed-point arithmetic overflowed
    Overflow,
    /// Balance ledger rejected the operation
    Ledger,
    /// SSZ record encode/decode failure
    Codec,
}

/// Why a participant was rejected as malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedReason {
    /// Both ask and bid are set
    BothSides,
    /// Neither ask nor bid is set
    NoSide,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::BothSides => f.write_str("both ask and bid are set"),
            MalformedReason::NoSide => f.write_str("neither ask nor bid is set"),
        }
    }
}

/// Conservation law checked after each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invariant {
    /// Seller filled quantity == buyer filled quantity == traded quantity
    FilledQuantity,
    /// Seller balance gain + buyer balance loss + spread surplus == 0
    BalanceConservation,
    /// filled + remaining == original for every participant
    ParticipantQuantity,
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invariant::FilledQuantity => f.write_str("filled quantity"),
            Invariant::BalanceConservation => f.write_str("balance conservation"),
            Invariant::ParticipantQuantity => f.write_str("participant quantity"),
        }
    }
}

/// Top-level auction error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("malformed order for participant {id}: {reason}")]
    MalformedOrder { id: u64, reason: MalformedReason },

    #[error("duplicate participant id {id} in round")]
    DuplicateParticipant { id: u64 },

    #[error("invariant violation ({invariant}) in round {round}: {detail}")]
    InvariantViolation {
        round: u64,
        invariant: Invariant,
        detail: String,
    },

    #[error("arithmetic overflow: {context}")]
    Overflow { context: &'static str },

    #[error("unknown ledger account {id}")]
    UnknownAccount { id: u64 },

    #[error("ledger account {id} already exists")]
    AccountExists { id: u64 },

    #[error("stale balance for account {id}: ledger has {ledger}, round started from {round}")]
    StaleBalance { id: u64, ledger: i64, round: i64 },

    #[error("account {id} cannot pay {amount}: balance is {balance}")]
    InsufficientFunds { id: u64, balance: i64, amount: i64 },

    #[error("codec error: {0}")]
    Codec(String),
}

impl AuctionError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::MalformedOrder { .. } => ErrorKind::MalformedOrder,
            AuctionError::DuplicateParticipant { .. } => ErrorKind::DuplicateParticipant,
            AuctionError::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            AuctionError::Overflow { .. } => ErrorKind::Overflow,
            AuctionError::UnknownAccount { .. }
            | AuctionError::AccountExists { .. }
            | AuctionError::StaleBalance { .. }
            | AuctionError::InsufficientFunds { .. } => ErrorKind::Ledger,
            AuctionError::Codec(_) => ErrorKind::Codec,
        }
    }

    /// True for errors that indicate a bug in the engine rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvariantViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let err = AuctionError::MalformedOrder {
            id: 7,
            reason: MalformedReason::NoSide,
        };
        assert_eq!(err.kind(), ErrorKind::MalformedOrder);
        assert!(!err.is_fatal());

        let err = AuctionError::InvariantViolation {
            round: 3,
            invariant: Invariant::BalanceConservation,
            detail: "off by one".into(),
        };
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert!(err.is_fatal());

        assert_eq!(AuctionError::UnknownAccount { id: 1 }.kind(), ErrorKind::Ledger);
    }

    #[test]
    fn test_error_display() {
        let err = AuctionError::MalformedOrder {
            id: 7,
            reason: MalformedReason::BothSides,
        };
        assert_eq!(
            err.to_string(),
            "malformed order for participant 7: both ask and bid are set"
        );
    }
}
