//! Core data types for the auction engine
//!
//! ## Types
//!
//! - [`Participant`]: one seller or buyer in a round
//! - [`Order`]: the side, price and quantity a participant submits
//! - [`ClearingResult`] / [`Clearing`]: where the round cleared
//! - [`Fill`]: one participant's settled fill
//! - [`RoundReceipt`]: per-round summary with a state root
//! - [`ParticipantRecord`] / [`AccountRecord`]: SSZ records for the ledger boundary
//!
//! ## Fixed-Point Arithmetic
//!
//! Prices and balances are integers scaled by 10^8, see [`price`].
//! Example: 22.5 is stored as 2_250_000_000

mod participant;
mod clearing;
mod receipt;
mod record;
pub mod price;

pub use participant::{Order, Participant, Side};
pub use clearing::{Clearing, ClearingResult, Fill, NoTradeReason};
pub use receipt::RoundReceipt;
pub use record::{AccountRecord, ParticipantRecord};
