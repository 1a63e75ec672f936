//! Data structures for Swiss pairing: players, scorecards, matches, tournaments.

mod game;
mod player;
mod tournament;

pub use game::{ByeAward, MatchId, MatchRecord, NextRound, Pairing};
pub use player::{
    rank, sanitize_name, Player, PlayerId, RankingEntry, ScoreDelta, Scorecard, BYE_POINTS,
    DRAW_POINTS, WIN_POINTS,
};
pub use tournament::{ErrorKind, Tournament, TournamentError, TournamentId};
