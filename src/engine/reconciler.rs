//! Merge settled books back into one participant list.

use std::collections::HashMap;

use crate::book::{Round, SortedBook};
use crate::types::Participant;

/// Slab keys of both books, ordered by participant id
///
/// Deterministic and order-preserving: merging the same settled books
/// twice yields the same sequence.
pub fn merge(round: &Round, sellers: &SortedBook, buyers: &SortedBook) -> Vec<usize> {
    let mut keyed: Vec<(u64, usize)> = sellers
        .keys()
        .chain(buyers.keys())
        .filter_map(|key| round.get(key).map(|p| (p.id, key)))
        .collect();
    keyed.sort_unstable_by_key(|&(id, _)| id);
    keyed.into_iter().map(|(_, key)| key).collect()
}

/// Derive each participant's filled quantity and return the round's final state
///
/// `filled_quantity = original − remaining`, where the original quantity
/// comes from `before`. Participants missing from `before` are reported as
/// unfilled.
pub fn reconcile(
    round: &mut Round,
    sellers: &SortedBook,
    buyers: &SortedBook,
    before: &[Participant],
) -> Vec<Participant> {
    let original: HashMap<u64, u64> = before.iter().map(|p| (p.id, p.quantity)).collect();

    merge(round, sellers, buyers)
        .into_iter()
        .filter_map(|key| {
            let participant = round.get_mut(key)?;
            let start = original.get(&participant.id).copied().unwrap_or(participant.quantity);
            participant.filled_quantity = start.saturating_sub(participant.quantity);
            Some(participant.clone())
        })
        .collect()
}
