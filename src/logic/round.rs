//! Next round: standings, bye for odd fields, then pairing.

use log::info;

use crate::logic::{pair_ranking, record_bye, select_bye, standings};
use crate::models::{ByeAward, NextRound, TournamentError, TournamentId};
use crate::store::TournamentStore;

/// Produce the pairings for the next round.
///
/// With an odd field the lowest-ranked player without a bye is removed and credited
/// with a bye before the rest is paired. Callers must not run this concurrently with
/// another pairing run or with outcome recording for the same tournament.
pub fn pair_for_next_round<S>(store: &mut S, tournament: TournamentId) -> Result<NextRound, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    let mut ranking = standings(&*store, tournament)?;

    let bye = if ranking.len() % 2 == 1 {
        let entry = ranking.remove(select_bye(&ranking)?);
        record_bye(store, tournament, entry.player_id)?;
        info!("Bye granted to {} in tournament {}", entry.name, tournament);
        Some(ByeAward {
            player_id: entry.player_id,
            name: entry.name,
        })
    } else {
        None
    };

    let pairings = pair_ranking(&*store, tournament, ranking)?;
    info!(
        "Paired {} match(es) for tournament {} ({} rematch(es))",
        pairings.len(),
        tournament,
        pairings.iter().filter(|p| p.rematch).count()
    );
    Ok(NextRound { pairings, bye })
}
