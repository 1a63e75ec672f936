//! Persistence collaborators: scorecard store, match ledger, and registration.
//!
//! Outcome writes go through a [`StoreSession`], which is committed once so that
//! a match and its score updates land together or not at all.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::models::{
    MatchRecord, Player, PlayerId, RankingEntry, ScoreDelta, Scorecard, Tournament, TournamentError,
    TournamentId,
};

/// Durable (tournament, player) -> scorecard mapping.
pub trait ScorecardStore {
    /// Point read. `None` if the player is not registered in the tournament.
    fn scorecard(
        &self,
        tournament: TournamentId,
        player: PlayerId,
    ) -> Result<Option<Scorecard>, TournamentError>;

    /// Every scorecard row of the tournament, ordered by score desc, played desc,
    /// then registration order.
    fn ranked_scorecards(&self, tournament: TournamentId) -> Result<Vec<RankingEntry>, TournamentError>;
}

/// Durable set of recorded matches.
pub trait MatchLedger {
    /// Whether `a` and `b` have met in this tournament, regardless of winner/loser slots.
    fn have_played(
        &self,
        tournament: TournamentId,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<bool, TournamentError>;

    /// All matches of the tournament in the order they were recorded.
    fn matches(&self, tournament: TournamentId) -> Result<Vec<MatchRecord>, TournamentError>;
}

/// Atomic unit of outcome writes. Dropping a session without [`StoreSession::commit`] discards it.
pub trait StoreSession {
    fn scorecard(
        &self,
        tournament: TournamentId,
        player: PlayerId,
    ) -> Result<Option<Scorecard>, TournamentError>;

    fn add_to_scorecard(
        &mut self,
        tournament: TournamentId,
        player: PlayerId,
        delta: ScoreDelta,
    ) -> Result<(), TournamentError>;

    fn insert_match(&mut self, record: &MatchRecord) -> Result<(), TournamentError>;

    fn commit(self: Box<Self>) -> Result<(), TournamentError>;
}

/// Full store: scorecards, ledger, registration and bulk resets.
pub trait TournamentStore: ScorecardStore + MatchLedger {
    fn create_tournament(&mut self, name: &str) -> Result<Tournament, TournamentError>;

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError>;

    /// Remove the tournament with its scorecards and matches.
    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError>;

    /// Create a player and a zeroed scorecard row for it.
    fn register_player(&mut self, tournament: TournamentId, name: &str) -> Result<Player, TournamentError>;

    /// Register several players as one unit: either every name gets a player and a
    /// scorecard row, or none does.
    fn register_players(
        &mut self,
        tournament: TournamentId,
        names: &[String],
    ) -> Result<Vec<Player>, TournamentError>;

    fn count_players(&self, tournament: TournamentId) -> Result<usize, TournamentError>;

    /// Returns the number of deleted match records.
    fn delete_matches(&mut self, tournament: TournamentId) -> Result<usize, TournamentError>;

    /// Unregisters every player of the tournament. Returns the number of deleted rows.
    fn delete_scorecards(&mut self, tournament: TournamentId) -> Result<usize, TournamentError>;

    fn begin(&mut self) -> Result<Box<dyn StoreSession + '_>, TournamentError>;
}
