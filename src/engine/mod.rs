//! Auction engine: one discrete batch auction per round.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same participants in, same outcome and state root out
//! 2. **Fixed-Point Math**: no floating-point operations
//! 3. **Synchronous Execution**: every stage completes before the next starts
//! 4. **Round Isolation**: each round owns its participants; rounds can run on
//!    separate threads with separate engines
//!
//! ## Pipeline
//!
//! ```text
//! split -> sort -> resolve -> allocate -> settle -> reconcile -> (check)
//! ```
//!
//! ## Example
//!
//! ```
//! use double_auction::engine::AuctionEngine;
//! use double_auction::types::Participant;
//! use double_auction::types::price::{from_units, balance_from_units};
//!
//! let mut engine = AuctionEngine::new();
//! let outcome = engine.run_round(vec![
//!     Participant::seller(1, "VNO1", 0, from_units(10), 5),
//!     Participant::buyer(2, "VNO2", 0, from_units(20), 5),
//! ]).unwrap();
//!
//! assert_eq!(outcome.clearing.traded_quantity(), 5);
//! assert_eq!(outcome.participant(1).unwrap().balance, balance_from_units(75));
//! assert_eq!(outcome.participant(2).unwrap().balance, balance_from_units(-75));
//! ```

pub mod allocator;
pub mod reconciler;
pub mod resolver;
pub mod settlement;

pub use resolver::{ClearingPoint, Resolution, FIRST_CROSS_INDEX};
pub use settlement::Settlement;

use tracing::{debug, info, info_span, warn};

use crate::book::Round;
use crate::config::AuctionConfig;
use crate::error::Result;
use crate::generator::OrderSource;
use crate::invariants;
use crate::types::{Clearing, ClearingResult, NoTradeReason, Participant, RoundReceipt};

/// Everything one round produced
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round_id: u64,

    /// Participants as submitted, in arrival order
    pub before: Vec<Participant>,

    /// Settled participants ordered by id, with `filled_quantity` set
    pub participants: Vec<Participant>,

    pub clearing: Clearing,

    pub settlement: Settlement,

    pub receipt: RoundReceipt,
}

impl RoundOutcome {
    /// Settled state of one participant
    pub fn participant(&self, id: u64) -> Option<&Participant> {
        self.participants
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|index| &self.participants[index])
    }
}

/// Batch double-auction engine
///
/// Holds only configuration and the round counter; participant state never
/// outlives a round.
#[derive(Debug, Default)]
pub struct AuctionEngine {
    config: AuctionConfig,
    next_round_id: u64,
}

impl AuctionEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(AuctionConfig::default())
    }

    pub fn with_config(config: AuctionConfig) -> Self {
        Self {
            config,
            next_round_id: 1,
        }
    }

    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// Number of rounds started so far
    pub fn rounds_run(&self) -> u64 {
        self.next_round_id.saturating_sub(1)
    }

    /// Validate and clear one round of participants
    ///
    /// # Errors
    ///
    /// - `MalformedOrder` / `DuplicateParticipant` before anything is computed
    /// - `Overflow` from checked settlement arithmetic
    /// - `InvariantViolation` when checks are enabled and settlement is wrong
    pub fn run_round(&mut self, participants: Vec<Participant>) -> Result<RoundOutcome> {
        let round = Round::from_participants(participants)?;
        self.clear(round)
    }

    /// Clear an already validated round
    pub fn clear(&mut self, mut round: Round) -> Result<RoundOutcome> {
        let round_id = self.next_round_id;
        self.next_round_id += 1;

        let span = info_span!("round", round_id);
        let _enter = span.enter();

        let before = round.snapshot();
        let (mut sellers, mut buyers) = round.split();
        sellers.sort();
        buyers.sort();
        debug!(sellers = sellers.len(), buyers = buyers.len(), "books sorted");

        let (clearing, settlement) =
            match resolver::resolve(&sellers, &buyers, self.config.exhaustion) {
                Resolution::NoTrade(reason) => {
                    debug!(?reason, "no trade");
                    (Clearing::NoTrade(reason), Settlement::default())
                }
                Resolution::Clear(point) => {
                    let quantity = allocator::tradable_quantity(
                        &round,
                        &sellers,
                        &buyers,
                        point.marginal_index,
                    )?;
                    if quantity == 0 {
                        debug!(marginal_index = point.marginal_index, "no units at clearing point");
                        (Clearing::NoTrade(NoTradeReason::NoQuantity), Settlement::default())
                    } else {
                        let result = ClearingResult {
                            marginal_index: point.marginal_index,
                            sell_price: point.sell_price,
                            buy_price: point.buy_price,
                            quantity,
                        };
                        debug!(
                            marginal_index = result.marginal_index,
                            sell_price = result.sell_price,
                            buy_price = result.buy_price,
                            quantity,
                            "clearing point"
                        );
                        let fills = settlement::settle(&mut round, &sellers, &buyers, &result)?;
                        (Clearing::Traded(result), fills)
                    }
                }
            };

        let participants = reconciler::reconcile(&mut round, &sellers, &buyers, &before);
        let receipt = RoundReceipt::new(
            round_id,
            participants.len() as u64,
            settlement.fills.len() as u64,
            clearing.traded_quantity(),
            RoundReceipt::compute_state_root(&participants)?,
        );

        let outcome = RoundOutcome {
            round_id,
            before,
            participants,
            clearing,
            settlement,
            receipt,
        };

        if self.config.verify_invariants {
            if let Err(err) = invariants::check_outcome(&outcome) {
                warn!(error = %err, "round failed conservation checks");
                return Err(err);
            }
        }

        info!(
            traded = outcome.receipt.traded_quantity,
            fills = outcome.receipt.fills,
            state_root = %outcome.receipt.state_root_hex(),
            "round cleared"
        );
        Ok(outcome)
    }

    /// Run `rounds` consecutive rounds drawn from `source`
    ///
    /// Stops at the first failing round.
    pub fn run_batch(
        &mut self,
        source: &mut dyn OrderSource,
        rounds: usize,
    ) -> Result<Vec<RoundOutcome>> {
        let mut outcomes = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            outcomes.push(self.run_round(source.next_round())?);
        }
        Ok(outcomes)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
