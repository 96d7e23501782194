//! Tradable quantity at a clearing point.

use crate::book::{Round, SortedBook};
use crate::error::Result;

/// Units both sides can absorb through `marginal_index`
///
/// The smaller of the cumulative seller and buyer quantities over
/// `0..=marginal_index`. The larger side ends up with at most one partial fill.
pub fn tradable_quantity(
    round: &Round,
    sellers: &SortedBook,
    buyers: &SortedBook,
    marginal_index: usize,
) -> Result<u64> {
    let supply = sellers.cumulative_quantity(round, marginal_index)?;
    let demand = buyers.cumulative_quantity(round, marginal_index)?;
    Ok(supply.min(demand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Participant;

    fn round() -> Round {
        Round::from_participants(vec![
            Participant::seller(1, "s1", 0, 10, 5),
            Participant::seller(2, "s2", 0, 20, 5),
            Participant::seller(3, "s3", 0, 30, 5),
            Participant::buyer(4, "b1", 0, 40, 4),
            Participant::buyer(5, "b2", 0, 25, 4),
            Participant::buyer(6, "b3", 0, 15, 100),
        ])
        .unwrap()
    }

    #[test]
    fn test_smaller_side_wins() {
        let round = round();
        let (mut sellers, mut buyers) = round.split();
        sellers.sort();
        buyers.sort();

        // supply 10, demand 8
        assert_eq!(tradable_quantity(&round, &sellers, &buyers, 1).unwrap(), 8);
        // supply 5, demand 4
        assert_eq!(tradable_quantity(&round, &sellers, &buyers, 0).unwrap(), 4);
        // supply 15, demand 108
        assert_eq!(tradable_quantity(&round, &sellers, &buyers, 2).unwrap(), 15);
    }

    #[test]
    fn test_zero_quantity_side() {
        let round = Round::from_participants(vec![
            Participant::seller(1, "s", 0, 10, 0),
            Participant::buyer(2, "b", 0, 20, 9),
        ])
        .unwrap();
        let (sellers, buyers) = round.split();
        assert_eq!(tradable_quantity(&round, &sellers, &buyers, 0).unwrap(), 0);
    }
}
