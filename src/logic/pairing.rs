//! Pairing: adjacent-rank pairs that skip previously played opponents.

use log::{debug, warn};

use crate::models::{Pairing, RankingEntry, TournamentError, TournamentId};
use crate::store::MatchLedger;

/// Pair an even-length ranking into `n / 2` disjoint pairs.
///
/// Repeatedly takes the best remaining player as anchor and pairs it with the first
/// lower-ranked player it has not met yet. If it has met all of them, it is paired
/// with the next player in rank and the pairing is flagged as a rematch.
pub fn pair_ranking<L>(
    ledger: &L,
    tournament: TournamentId,
    ranking: Vec<RankingEntry>,
) -> Result<Vec<Pairing>, TournamentError>
where
    L: MatchLedger + ?Sized,
{
    if ranking.len() % 2 != 0 {
        return Err(TournamentError::InvalidInput(format!(
            "cannot pair an odd field of {} players; assign a bye first",
            ranking.len()
        )));
    }

    let mut pairings = Vec::with_capacity(ranking.len() / 2);
    let mut remaining = ranking;
    while !remaining.is_empty() {
        let anchor = remaining.remove(0);
        let (index, rematch) = match first_new_opponent(ledger, tournament, &anchor, &remaining)? {
            Some(index) => (index, false),
            None => {
                warn!(
                    "{} has played every remaining candidate; accepting rematch with {}",
                    anchor.name, remaining[0].name
                );
                (0, true)
            }
        };
        let opponent = remaining.remove(index);
        pairings.push(Pairing::new(&anchor, &opponent, rematch));
    }
    Ok(pairings)
}

fn first_new_opponent<L>(
    ledger: &L,
    tournament: TournamentId,
    anchor: &RankingEntry,
    candidates: &[RankingEntry],
) -> Result<Option<usize>, TournamentError>
where
    L: MatchLedger + ?Sized,
{
    for (index, candidate) in candidates.iter().enumerate() {
        if !ledger.have_played(tournament, anchor.player_id, candidate.player_id)? {
            return Ok(Some(index));
        }
        debug!("skipping {} vs {}: already played", anchor.name, candidate.name);
    }
    Ok(None)
}
