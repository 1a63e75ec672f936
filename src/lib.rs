//! Swiss-system tournament pairing: library with models, store collaborators and logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    create_tournament, delete_matches, delete_scorecards, has_bye, import_players_csv,
    pair_for_next_round, pair_ranking, record_bye, record_match, register_player, select_bye,
    standings,
};
pub use models::{
    rank, sanitize_name, ByeAward, ErrorKind, MatchId, MatchRecord, NextRound, Pairing, Player,
    PlayerId, RankingEntry, ScoreDelta, Scorecard, Tournament, TournamentError, TournamentId,
    BYE_POINTS, DRAW_POINTS, WIN_POINTS,
};
pub use store::{MatchLedger, MemoryStore, ScorecardStore, SqliteStore, StoreSession, TournamentStore};
