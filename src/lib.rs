//! # Double Auction
//!
//! Batch double-auction market clearing.
//!
//! ## Architecture
//!
//! Each round runs through a fixed pipeline:
//! - **Book**: participants in a slab arena, split into seller and buyer books and sorted
//! - **Engine**: clearing-point resolution, quantity allocation, settlement, reconciliation
//! - **Invariants**: per-round conservation checks and a cross-round tracker
//! - **Ledger**: balances that outlive a round
//! - **Generator**: pluggable order sources, seedable for reproducible runs
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical rounds produce identical receipts and state roots
//! 2. **No Floating Point**: prices and balances use fixed-point arithmetic (10^8 scaling)
//! 3. **Checked Math**: settlement overflow is an error, never a wrap
//! 4. **Synchronous Execution**: one round at a time per engine; rounds are
//!    independent and can run on separate threads

// ============================================================================
// Module declarations
// ============================================================================

/// Error type and result alias
pub mod error;

/// Engine and generator configuration
pub mod config;

/// Core data types: Participant, ClearingResult, RoundReceipt
pub mod types;

/// Round arena and sorted books
pub mod book;

/// Auction engine: resolver, allocator, settlement, reconciler
pub mod engine;

/// Conservation checks
pub mod invariants;

/// Order sources
pub mod generator;

/// Cross-round balance ledger
pub mod ledger;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{AuctionConfig, ExhaustionPolicy, GeneratorConfig};
pub use engine::{AuctionEngine, RoundOutcome};
pub use error::{AuctionError, ErrorKind, Result};
pub use generator::{OrderSource, RandomOrderSource, ReplaySource};
pub use invariants::InvariantTracker;
pub use ledger::Ledger;
pub use types::{Clearing, ClearingResult, NoTradeReason, Participant, RoundReceipt, Side};
