//! Outcome recording: match results and byes.
//!
//! Neither operation is idempotent. A failed call is never retried here; submitting
//! the same outcome twice counts it twice.

use log::{error, info};

use crate::models::{MatchRecord, PlayerId, ScoreDelta, TournamentError, TournamentId};
use crate::store::{StoreSession, TournamentStore};

/// Record a match. Winner gets 3 points, loser 0; on a draw both get 1. Both `played` go up by 1.
///
/// The ledger insert and both scorecard updates are committed as one unit. On failure
/// nothing is applied and resubmitting the same outcome is safe.
pub fn record_match<S>(
    store: &mut S,
    tournament: TournamentId,
    winner: PlayerId,
    loser: PlayerId,
    is_draw: bool,
) -> Result<MatchRecord, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    if winner == loser {
        return Err(TournamentError::InvalidInput(
            "a player cannot play against themselves".to_string(),
        ));
    }
    if store.tournament(tournament)?.is_none() {
        return Err(TournamentError::TournamentNotFound(tournament));
    }

    let mut session = store.begin()?;
    require_scorecard(&*session, tournament, winner)?;
    require_scorecard(&*session, tournament, loser)?;

    let record = MatchRecord::new(tournament, winner, loser, is_draw);
    let (winner_delta, loser_delta) = if is_draw {
        (ScoreDelta::DRAW, ScoreDelta::DRAW)
    } else {
        (ScoreDelta::WIN, ScoreDelta::LOSS)
    };

    session
        .insert_match(&record)
        .map_err(|e| rolled_back("match insert", e))?;
    session
        .add_to_scorecard(tournament, winner, winner_delta)
        .map_err(|e| rolled_back("winner update", e))?;
    session
        .add_to_scorecard(tournament, loser, loser_delta)
        .map_err(|e| rolled_back("loser update", e))?;
    session.commit().map_err(|e| rolled_back("commit", e))?;

    if is_draw {
        info!("Recorded draw {} - {} in tournament {}", winner, loser, tournament);
    } else {
        info!("Recorded win {} over {} in tournament {}", winner, loser, tournament);
    }
    Ok(record)
}

/// Credit a bye: +3 points and +1 bye, no match record and no `played` increment.
pub fn record_bye<S>(store: &mut S, tournament: TournamentId, player: PlayerId) -> Result<(), TournamentError>
where
    S: TournamentStore + ?Sized,
{
    if store.tournament(tournament)?.is_none() {
        return Err(TournamentError::TournamentNotFound(tournament));
    }
    let mut session = store.begin()?;
    require_scorecard(&*session, tournament, player)?;
    session
        .add_to_scorecard(tournament, player, ScoreDelta::BYE)
        .map_err(|e| rolled_back("bye update", e))?;
    session.commit().map_err(|e| rolled_back("commit", e))?;
    info!("Recorded bye for {} in tournament {}", player, tournament);
    Ok(())
}

fn require_scorecard(
    session: &dyn StoreSession,
    tournament: TournamentId,
    player: PlayerId,
) -> Result<(), TournamentError> {
    match session.scorecard(tournament, player)? {
        Some(_) => Ok(()),
        None => Err(TournamentError::ScorecardNotFound { tournament, player }),
    }
}

/// A write failed inside the unit. The session is dropped uncommitted, so nothing was
/// applied and the error keeps its own kind. Only a store that detects a partial apply
/// reports `IntegrityViolation`.
fn rolled_back(step: &str, err: TournamentError) -> TournamentError {
    error!("Outcome {} failed, nothing applied: {}", step, err);
    err
}
