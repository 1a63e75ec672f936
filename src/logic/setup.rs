//! Setup: tournaments, player registration, bulk import and resets.

use std::io::Read;

use log::info;
use serde::Deserialize;

use crate::models::{sanitize_name, Player, Tournament, TournamentError, TournamentId};
use crate::store::TournamentStore;

/// Create a tournament. The name is sanitized like player names.
pub fn create_tournament<S>(store: &mut S, name: &str) -> Result<Tournament, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    let name = clean(name, "tournament")?;
    let tournament = store.create_tournament(&name)?;
    info!("Created tournament {} ({})", tournament.name, tournament.id);
    Ok(tournament)
}

/// Register a player: sanitized name, fresh id, zeroed scorecard in `tournament`.
pub fn register_player<S>(store: &mut S, tournament: TournamentId, name: &str) -> Result<Player, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    let name = clean(name, "player")?;
    let player = store.register_player(tournament, &name)?;
    info!("Registered {} ({}) in tournament {}", player.name, player.id, tournament);
    Ok(player)
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    name: String,
}

/// Register every player of a CSV document with a `name` header column.
///
/// Rows are validated first and the first bad row fails the import. The valid names are
/// then registered in one store unit, so a failed import registers nobody.
pub fn import_players_csv<S, R>(
    store: &mut S,
    tournament: TournamentId,
    reader: R,
) -> Result<Vec<Player>, TournamentError>
where
    S: TournamentStore + ?Sized,
    R: Read,
{
    if store.tournament(tournament)?.is_none() {
        return Err(TournamentError::TournamentNotFound(tournament));
    }

    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut names = Vec::new();
    for (i, row) in csv_reader.deserialize::<PlayerRow>().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let row = row.map_err(|e| TournamentError::InvalidInput(format!("CSV line {line}: {e}")))?;
        let name = sanitize_name(&row.name)
            .ok_or_else(|| TournamentError::InvalidInput(format!("CSV line {line}: empty name")))?;
        names.push(name);
    }

    let players = store.register_players(tournament, &names)?;
    info!("Imported {} player(s) into tournament {}", players.len(), tournament);
    Ok(players)
}

/// Remove all match records of the tournament. Scorecards are left as they are.
pub fn delete_matches<S>(store: &mut S, tournament: TournamentId) -> Result<usize, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    let deleted = store.delete_matches(tournament)?;
    info!("Deleted {} match(es) from tournament {}", deleted, tournament);
    Ok(deleted)
}

/// Unregister every player of the tournament.
pub fn delete_scorecards<S>(store: &mut S, tournament: TournamentId) -> Result<usize, TournamentError>
where
    S: TournamentStore + ?Sized,
{
    let deleted = store.delete_scorecards(tournament)?;
    info!("Deleted {} scorecard(s) from tournament {}", deleted, tournament);
    Ok(deleted)
}

fn clean(name: &str, what: &str) -> Result<String, TournamentError> {
    sanitize_name(name).ok_or_else(|| TournamentError::InvalidInput(format!("{what} name must not be empty")))
}
