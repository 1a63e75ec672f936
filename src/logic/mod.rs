//! Swiss pairing logic: standings, byes, pairing, outcome recording, setup.

mod bye;
mod outcome;
mod pairing;
mod round;
mod setup;
mod standings;

pub use bye::{has_bye, select_bye};
pub use outcome::{record_bye, record_match};
pub use pairing::pair_ranking;
pub use round::pair_for_next_round;
pub use setup::{create_tournament, delete_matches, delete_scorecards, import_players_csv, register_player};
pub use standings::standings;
