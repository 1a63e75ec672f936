//! Bye selection for odd fields.

use crate::models::{PlayerId, RankingEntry, TournamentError, TournamentId};
use crate::store::ScorecardStore;

/// Index of the player who should sit out with a bye.
///
/// Scans from the bottom of the ranking upward and picks the first player without a
/// bye. Fails with [`TournamentError::ByesExhausted`] when everyone already has one.
pub fn select_bye(ranking: &[RankingEntry]) -> Result<usize, TournamentError> {
    ranking
        .iter()
        .rposition(|entry| !entry.has_bye())
        .ok_or(TournamentError::ByesExhausted)
}

/// Whether the player has already received a bye in this tournament.
pub fn has_bye<S>(store: &S, tournament: TournamentId, player: PlayerId) -> Result<bool, TournamentError>
where
    S: ScorecardStore + ?Sized,
{
    let card = store
        .scorecard(tournament, player)?
        .ok_or(TournamentError::ScorecardNotFound { tournament, player })?;
    Ok(card.bye_count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(bye_count: u32) -> RankingEntry {
        RankingEntry {
            player_id: Uuid::new_v4(),
            name: String::new(),
            score: 0,
            played: 0,
            bye_count,
        }
    }

    #[test]
    fn picks_lowest_ranked_without_bye() {
        let ranking = vec![entry(0), entry(0), entry(1), entry(0), entry(1)];
        assert_eq!(select_bye(&ranking).unwrap(), 3);
    }

    #[test]
    fn exhausted_when_everyone_has_a_bye() {
        let ranking = vec![entry(1), entry(1), entry(2)];
        assert!(matches!(select_bye(&ranking), Err(TournamentError::ByesExhausted)));
    }
}
