//! Persistent participant balances across rounds.
//!
//! The engine itself forgets participants when a round ends. The ledger is
//! the long-lived side: it stamps current balances onto the next round's
//! participants and writes the settled balances back.
//!
//! ```text
//! Ledger::prepare_round -> AuctionEngine::run_round -> Ledger::apply
//! ```
//!
//! Mutation goes through `&mut self`, so there is a single writer. `apply`
//! also refuses an outcome whose starting balances no longer match the
//! ledger, which catches rounds prepared against an older state.

use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::RoundOutcome;
use crate::error::{AuctionError, Result};
use crate::types::{AccountRecord, Participant};

/// Account balances keyed by participant id (fixed-point)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    accounts: BTreeMap<u64, i64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an account with a starting balance
    pub fn open(&mut self, id: u64, balance: i64) -> Result<()> {
        if self.accounts.contains_key(&id) {
            return Err(AuctionError::AccountExists { id });
        }
        self.accounts.insert(id, balance);
        Ok(())
    }

    pub fn balance(&self, id: u64) -> Result<i64> {
        self.accounts
            .get(&id)
            .copied()
            .ok_or(AuctionError::UnknownAccount { id })
    }

    /// Close an account, returning its final balance
    pub fn close(&mut self, id: u64) -> Result<i64> {
        self.accounts
            .remove(&id)
            .ok_or(AuctionError::UnknownAccount { id })
    }

    /// Move `amount` (fixed-point) from one account to another
    ///
    /// # Errors
    ///
    /// - [`AuctionError::UnknownAccount`] if either account is missing
    /// - [`AuctionError::InsufficientFunds`] if `from` holds less than `amount`
    pub fn transfer(&mut self, from: u64, to: u64, amount: u64) -> Result<()> {
        let amount = i64::try_from(amount).map_err(|_| AuctionError::Overflow {
            context: "transfer amount",
        })?;
        let balance = self.balance(from)?;
        let target = self.balance(to)?;
        if balance < amount {
            return Err(AuctionError::InsufficientFunds { id: from, balance, amount });
        }
        if from == to {
            return Ok(());
        }

        let credited = target
            .checked_add(amount)
            .ok_or(AuctionError::Overflow { context: "transfer credit" })?;
        self.accounts.insert(from, balance - amount);
        self.accounts.insert(to, credited);
        debug!(from, to, amount, "transfer");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// `(id, balance)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (u64, i64)> + '_ {
        self.accounts.iter().map(|(&id, &balance)| (id, balance))
    }

    /// Overwrite each participant's balance with the ledger's
    ///
    /// # Errors
    ///
    /// [`AuctionError::UnknownAccount`] if any participant has no account.
    pub fn prepare_round(&self, mut orders: Vec<Participant>) -> Result<Vec<Participant>> {
        for participant in &mut orders {
            participant.balance = self.balance(participant.id)?;
        }
        Ok(orders)
    }

    /// Write a settled round's balances back
    ///
    /// Validates every account before changing any, so a rejected outcome
    /// leaves the ledger untouched.
    ///
    /// # Errors
    ///
    /// - [`AuctionError::UnknownAccount`] for a participant without an account
    /// - [`AuctionError::StaleBalance`] when a starting balance differs from the ledger
    pub fn apply(&mut self, outcome: &RoundOutcome) -> Result<()> {
        for participant in &outcome.before {
            let ledger = self.balance(participant.id)?;
            if ledger != participant.balance {
                return Err(AuctionError::StaleBalance {
                    id: participant.id,
                    ledger,
                    round: participant.balance,
                });
            }
        }

        for participant in &outcome.participants {
            if let Some(balance) = self.accounts.get_mut(&participant.id) {
                *balance = participant.balance;
            }
        }
        debug!(
            round_id = outcome.round_id,
            accounts = outcome.participants.len(),
            "applied round to ledger"
        );
        Ok(())
    }

    /// Concatenated SSZ [`AccountRecord`]s in id order
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.accounts.len() * AccountRecord::SIZE);
        for (id, balance) in self.iter() {
            bytes.extend(AccountRecord::new(id, balance).encode()?);
        }
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % AccountRecord::SIZE != 0 {
            return Err(AuctionError::Codec(format!(
                "ledger length {} is not a multiple of {}",
                bytes.len(),
                AccountRecord::SIZE
            )));
        }

        let mut ledger = Self::new();
        for chunk in bytes.chunks_exact(AccountRecord::SIZE) {
            let record = AccountRecord::decode(chunk)?;
            ledger.open(record.id, record.balance())?;
        }
        Ok(ledger)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AuctionEngine;
    use crate::error::ErrorKind;
    use crate::types::price::{balance_from_units, from_units};

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.open(1, balance_from_units(100)).unwrap();
        ledger.open(2, balance_from_units(100)).unwrap();
        ledger
    }

    fn orders() -> Vec<Participant> {
        vec![
            Participant::seller(1, "VNO1", 0, from_units(10), 5),
            Participant::buyer(2, "VNO2", 0, from_units(20), 5),
        ]
    }

    #[test]
    fn test_open_and_close() {
        let mut ledger = ledger();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.open(1, 0), Err(AuctionError::AccountExists { id: 1 }));

        assert_eq!(ledger.close(2).unwrap(), balance_from_units(100));
        assert_eq!(ledger.balance(2), Err(AuctionError::UnknownAccount { id: 2 }));
        assert_eq!(ledger.close(2).unwrap_err().kind(), ErrorKind::Ledger);
    }

    #[test]
    fn test_prepare_stamps_balances() {
        let prepared = ledger().prepare_round(orders()).unwrap();
        assert!(prepared.iter().all(|p| p.balance == balance_from_units(100)));

        let mut unknown = orders();
        unknown.push(Participant::buyer(3, "VNO3", 0, 1, 1));
        assert_eq!(
            ledger().prepare_round(unknown),
            Err(AuctionError::UnknownAccount { id: 3 })
        );
    }

    #[test]
    fn test_apply_round() {
        let mut ledger = ledger();
        let mut engine = AuctionEngine::new();
        let outcome = engine.run_round(ledger.prepare_round(orders()).unwrap()).unwrap();

        ledger.apply(&outcome).unwrap();
        assert_eq!(ledger.balance(1).unwrap(), balance_from_units(175));
        assert_eq!(ledger.balance(2).unwrap(), balance_from_units(25));
    }

    #[test]
    fn test_apply_twice_is_stale() {
        let mut ledger = ledger();
        let mut engine = AuctionEngine::new();
        let outcome = engine.run_round(ledger.prepare_round(orders()).unwrap()).unwrap();

        ledger.apply(&outcome).unwrap();
        let snapshot = ledger.clone();

        let err = ledger.apply(&outcome).unwrap_err();
        assert_eq!(
            err,
            AuctionError::StaleBalance {
                id: 1,
                ledger: balance_from_units(175),
                round: balance_from_units(100),
            }
        );
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_encode_decode() {
        let mut ledger = ledger();
        ledger.open(9, balance_from_units(-3)).unwrap();

        let bytes = ledger.encode().unwrap();
        assert_eq!(bytes.len(), 3 * AccountRecord::SIZE);

        let decoded = Ledger::decode(&bytes).unwrap();
        assert_eq!(decoded, ledger);
        assert_eq!(decoded.balance(9).unwrap(), balance_from_units(-3));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let bytes = ledger().encode().unwrap();
        assert_eq!(Ledger::decode(&bytes[..5]).unwrap_err().kind(), ErrorKind::Codec);

        let mut doubled = bytes.clone();
        doubled.extend_from_slice(&bytes[..AccountRecord::SIZE]);
        assert_eq!(Ledger::decode(&doubled), Err(AuctionError::AccountExists { id: 1 }));
    }

    #[test]
    fn test_transfer() {
        let mut ledger = ledger();
        ledger.transfer(1, 2, from_units(30)).unwrap();
        assert_eq!(ledger.balance(1).unwrap(), balance_from_units(70));
        assert_eq!(ledger.balance(2).unwrap(), balance_from_units(130));

        // Exactly the whole balance is allowed
        ledger.transfer(1, 2, from_units(70)).unwrap();
        assert_eq!(ledger.balance(1).unwrap(), 0);
    }

    #[test]
    fn test_transfer_rejects_overdraft() {
        let mut ledger = ledger();
        let snapshot = ledger.clone();

        let err = ledger.transfer(1, 2, from_units(101)).unwrap_err();
        assert_eq!(
            err,
            AuctionError::InsufficientFunds {
                id: 1,
                balance: balance_from_units(100),
                amount: balance_from_units(101),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Ledger);
        assert_eq!(ledger.transfer(1, 3, 1), Err(AuctionError::UnknownAccount { id: 3 }));
        assert_eq!(ledger, snapshot);
    }
}
