// Oracle provider votes and the two-thirds rule used to settle a bet.
use crate::core::tally::OrderedTally;
use crate::core::wire::MAX_ORACLE_PROVIDERS;

/// Per-provider vote, indexed by provider slot; `None` until that provider voted.
pub fn oracle_votes(
    n_providers: usize,
    won_option: &[i8; MAX_ORACLE_PROVIDERS],
    op_id: &[i8; MAX_ORACLE_PROVIDERS],
) -> Vec<Option<u8>> {
    let mut votes = vec![None; n_providers];
    for (option, provider) in won_option.iter().zip(op_id.iter()) {
        if *option < 0 || *provider < 0 {
            continue;
        }
        if let Some(vote) = votes.get_mut(*provider as usize) {
            *vote = Some(*option as u8);
        }
    }
    votes
}

/// Winning option if the most-voted option holds at least two thirds of all providers.
pub fn resolve_outcome(votes: &[Option<u8>]) -> Option<u8> {
    let mut tally = OrderedTally::new();
    for option in votes.iter().flatten() {
        tally.bump(*option);
    }
    let (option, dominant) = tally.max_entry()?;
    if dominant as usize * 3 >= votes.len() * 2 {
        Some(option)
    } else {
        None
    }
}
