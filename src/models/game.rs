//! Match records, pairings and the result of a pairing run.

use crate::models::player::{PlayerId, RankingEntry};
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A reported match outcome. Never updated once written.
///
/// For a draw the winner/loser slots carry no meaning beyond storage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub is_draw: bool,
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(tournament_id: TournamentId, winner: PlayerId, loser: PlayerId, is_draw: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            winner,
            loser,
            is_draw,
            recorded_at: Utc::now(),
        }
    }

    /// True if this match was between `a` and `b`, in either slot order.
    pub fn is_between(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.winner == a && self.loser == b) || (self.winner == b && self.loser == a)
    }
}

/// One pairing of the next round. The anchor (higher ranked) is player 1.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
    /// Set when every other remaining candidate had already played the anchor.
    pub rematch: bool,
}

impl Pairing {
    pub fn new(anchor: &RankingEntry, opponent: &RankingEntry, rematch: bool) -> Self {
        Self {
            player1_id: anchor.player_id,
            player1_name: anchor.name.clone(),
            player2_id: opponent.player_id,
            player2_name: opponent.name.clone(),
            rematch,
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1_id == player || self.player2_id == player
    }
}

/// The player credited with a bye for the round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ByeAward {
    pub player_id: PlayerId,
    pub name: String,
}

/// Result of one pairing run.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NextRound {
    /// In the order the anchors were taken from the ranking.
    pub pairings: Vec<Pairing>,
    pub bye: Option<ByeAward>,
}
