//! Order sources feeding the engine one round at a time.
//!
//! [`RandomOrderSource`] reproduces the benchmark workload: a fixed set of
//! sellers followed by a fixed set of buyers, every one with a fresh random
//! price and quantity each round. Seeding it with [`RandomOrderSource::seeded`]
//! makes the whole sequence reproducible.
//!
//! Any `FnMut() -> Vec<Participant>` is also an [`OrderSource`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GeneratorConfig;
use crate::types::price::{balance_from_units, from_units};
use crate::types::Participant;

/// Produces the participants of the next round
pub trait OrderSource {
    fn next_round(&mut self) -> Vec<Participant>;
}

impl<F> OrderSource for F
where
    F: FnMut() -> Vec<Participant>,
{
    fn next_round(&mut self) -> Vec<Participant> {
        self()
    }
}

/// Random sellers and buyers drawn from `R`
#[derive(Debug, Clone)]
pub struct RandomOrderSource<R: Rng> {
    rng: R,
    config: GeneratorConfig,
    rounds: u64,
}

impl RandomOrderSource<ChaCha8Rng> {
    /// Reproducible source: same seed and config, same rounds
    pub fn seeded(seed: u64, config: GeneratorConfig) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> RandomOrderSource<R> {
    pub fn new(rng: R, config: GeneratorConfig) -> Self {
        Self { rng, config, rounds: 0 }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Rounds generated so far
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    fn participant(&mut self, id: u64, sell: bool) -> Participant {
        let balance = balance_from_units(self.config.initial_balance);
        let quantity = self.rng.gen_range(0..=self.config.max_quantity);
        let name = format!("VNO{id}");

        if sell {
            let ask = self.rng.gen_range(1..=self.config.max_ask.max(1));
            Participant::seller(id, name, balance, from_units(ask), quantity)
        } else {
            let bid = self.rng.gen_range(1..=self.config.max_bid.max(1));
            Participant::buyer(id, name, balance, from_units(bid), quantity)
        }
    }
}

impl<R: Rng> OrderSource for RandomOrderSource<R> {
    /// Sellers get ids `1..=sellers`, buyers the ids after them
    fn next_round(&mut self) -> Vec<Participant> {
        let sellers = self.config.sellers as u64;
        let total = sellers + self.config.buyers as u64;

        let round = (1..=total)
            .map(|id| self.participant(id, id <= sellers))
            .collect();
        self.rounds += 1;
        round
    }
}

/// Replays a fixed list of rounds, then yields empty rounds
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    rounds: VecDeque<Vec<Participant>>,
}

impl ReplaySource {
    pub fn new(rounds: impl IntoIterator<Item = Vec<Participant>>) -> Self {
        Self {
            rounds: rounds.into_iter().collect(),
        }
    }

    /// Queue another round at the end
    pub fn push(&mut self, round: Vec<Participant>) {
        self.rounds.push_back(round);
    }

    pub fn remaining(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.rounds.is_empty()
    }
}

impl OrderSource for ReplaySource {
    fn next_round(&mut self) -> Vec<Participant> {
        self.rounds.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::SCALE;
    use crate::types::Side;

    #[test]
    fn test_random_round_layout() {
        let mut source = RandomOrderSource::seeded(7, GeneratorConfig::default());
        let round = source.next_round();

        assert_eq!(round.len(), 10);
        for (index, participant) in round.iter().enumerate() {
            let id = index as u64 + 1;
            assert_eq!(participant.id, id);
            assert_eq!(participant.name, format!("VNO{id}"));
            assert_eq!(participant.balance, balance_from_units(10_000));
            assert!(participant.quantity <= 1_000);

            let expected = if id <= 5 { Side::Sell } else { Side::Buy };
            assert_eq!(participant.side().unwrap(), expected);

            let price = participant.limit_price().unwrap();
            assert_eq!(price % SCALE, 0);
            assert!((1..=100).contains(&(price / SCALE)));
        }
        assert_eq!(source.rounds(), 1);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let config = GeneratorConfig::default().with_participants(3, 4);
        let mut a = RandomOrderSource::seeded(99, config);
        let mut b = RandomOrderSource::seeded(99, config);
        for _ in 0..20 {
            assert_eq!(a.next_round(), b.next_round());
        }

        let mut c = RandomOrderSource::seeded(100, config);
        let mut a = RandomOrderSource::seeded(99, config);
        assert_ne!(a.next_round(), c.next_round());
    }

    #[test]
    fn test_price_ceiling() {
        let config = GeneratorConfig::default().with_price_ceiling(1, 1).with_max_quantity(0);
        let mut source = RandomOrderSource::seeded(1, config);
        for participant in source.next_round() {
            assert_eq!(participant.limit_price(), Some(SCALE));
            assert_eq!(participant.quantity, 0);
        }
    }

    #[test]
    fn test_replay_source() {
        let first = vec![Participant::seller(1, "a", 0, 1, 1)];
        let second = vec![Participant::buyer(2, "b", 0, 1, 1)];
        let mut source = ReplaySource::new([first.clone(), second.clone()]);

        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_round(), first);
        assert_eq!(source.next_round(), second);
        assert!(source.is_exhausted());
        assert!(source.next_round().is_empty());
    }

    #[test]
    fn test_closure_source() {
        let mut calls = 0u64;
        let mut source = || {
            calls += 1;
            vec![Participant::seller(calls, "s", 0, 1, 1)]
        };
        assert_eq!(source.next_round()[0].id, 1);
        assert_eq!(OrderSource::next_round(&mut source)[0].id, 2);
    }
}
