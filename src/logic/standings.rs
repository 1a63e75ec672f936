//! Standings: the ranking every pairing run starts from.

use crate::models::{RankingEntry, TournamentError, TournamentId};
use crate::store::TournamentStore;

/// Current standings of every registered player, best first.
///
/// Ordered by score desc, then games played desc. Players equal on both keep the
/// store's registration order. The store's ranked read already returns this order.
/// Fails only if the tournament does not exist.
pub fn standings<S>(store: &S, tournament: TournamentId) -> Result<Vec<RankingEntry>, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    if store.tournament(tournament)?.is_none() {
        return Err(TournamentError::TournamentNotFound(tournament));
    }
    store.ranked_scorecards(tournament)
}
