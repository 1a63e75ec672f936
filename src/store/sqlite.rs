//! SQLite-backed store. Every statement binds its arguments; none is assembled from strings.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::models::{
    MatchRecord, Player, PlayerId, RankingEntry, ScoreDelta, Scorecard, Tournament, TournamentError,
    TournamentId,
};
use crate::store::{MatchLedger, ScorecardStore, StoreSession, TournamentStore};

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tournaments (
    id         BLOB PRIMARY KEY,
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS players (
    id   BLOB PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS scorecards (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    tournament_id BLOB    NOT NULL REFERENCES tournaments (id),
    player_id     BLOB    NOT NULL REFERENCES players (id),
    score         INTEGER NOT NULL DEFAULT 0,
    played        INTEGER NOT NULL DEFAULT 0,
    bye_count     INTEGER NOT NULL DEFAULT 0,
    UNIQUE (tournament_id, player_id)
);

CREATE TABLE IF NOT EXISTS matches (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    id            BLOB    NOT NULL UNIQUE,
    tournament_id BLOB    NOT NULL REFERENCES tournaments (id),
    winner        BLOB    NOT NULL REFERENCES players (id),
    loser         BLOB    NOT NULL REFERENCES players (id),
    is_draw       INTEGER NOT NULL,
    recorded_at   TEXT    NOT NULL
);
";

/// Store on a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TournamentError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, TournamentError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, TournamentError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn require_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        match self.tournament(id)? {
            Some(_) => Ok(()),
            None => Err(TournamentError::TournamentNotFound(id)),
        }
    }
}

fn read_scorecard(
    conn: &Connection,
    tournament: TournamentId,
    player: PlayerId,
) -> Result<Option<Scorecard>, TournamentError> {
    let card = conn
        .query_row(
            "SELECT score, played, bye_count FROM scorecards
             WHERE tournament_id = ?1 AND player_id = ?2",
            params![tournament, player],
            |row| {
                Ok(Scorecard {
                    score: row.get(0)?,
                    played: row.get(1)?,
                    bye_count: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(card)
}

impl ScorecardStore for SqliteStore {
    fn scorecard(
        &self,
        tournament: TournamentId,
        player: PlayerId,
    ) -> Result<Option<Scorecard>, TournamentError> {
        read_scorecard(&self.conn, tournament, player)
    }

    fn ranked_scorecards(&self, tournament: TournamentId) -> Result<Vec<RankingEntry>, TournamentError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name, s.score, s.played, s.bye_count
             FROM scorecards s JOIN players p ON p.id = s.player_id
             WHERE s.tournament_id = ?1
             ORDER BY s.score DESC, s.played DESC, s.seq ASC",
        )?;
        let rows = stmt.query_map(params![tournament], |row| {
            Ok(RankingEntry {
                player_id: row.get(0)?,
                name: row.get(1)?,
                score: row.get(2)?,
                played: row.get(3)?,
                bye_count: row.get(4)?,
            })
        })?;
        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl MatchLedger for SqliteStore {
    fn have_played(
        &self,
        tournament: TournamentId,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<bool, TournamentError> {
        let played = self.conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM matches
                WHERE tournament_id = ?1
                  AND ((winner = ?2 AND loser = ?3) OR (winner = ?3 AND loser = ?2))
             )",
            params![tournament, a, b],
            |row| row.get(0),
        )?;
        Ok(played)
    }

    fn matches(&self, tournament: TournamentId) -> Result<Vec<MatchRecord>, TournamentError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, tournament_id, winner, loser, is_draw, recorded_at
             FROM matches WHERE tournament_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![tournament], |row| {
            Ok(MatchRecord {
                id: row.get(0)?,
                tournament_id: row.get(1)?,
                winner: row.get(2)?,
                loser: row.get(3)?,
                is_draw: row.get(4)?,
                recorded_at: row.get(5)?,
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl TournamentStore for SqliteStore {
    fn create_tournament(&mut self, name: &str) -> Result<Tournament, TournamentError> {
        let tournament = Tournament::new(name);
        self.conn.execute(
            "INSERT INTO tournaments (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![tournament.id, tournament.name, tournament.created_at],
        )?;
        Ok(tournament)
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError> {
        let tournament = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM tournaments WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Tournament {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(tournament)
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        self.require_tournament(id)?;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM matches WHERE tournament_id = ?1", params![id])?;
        tx.execute("DELETE FROM scorecards WHERE tournament_id = ?1", params![id])?;
        tx.execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn register_player(&mut self, tournament: TournamentId, name: &str) -> Result<Player, TournamentError> {
        self.require_tournament(tournament)?;
        let player = Player::new(name);
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO players (id, name) VALUES (?1, ?2)",
            params![player.id, player.name],
        )?;
        tx.execute(
            "INSERT INTO scorecards (tournament_id, player_id) VALUES (?1, ?2)",
            params![tournament, player.id],
        )?;
        tx.commit()?;
        Ok(player)
    }

    fn register_players(
        &mut self,
        tournament: TournamentId,
        names: &[String],
    ) -> Result<Vec<Player>, TournamentError> {
        self.require_tournament(tournament)?;
        let tx = self.conn.transaction()?;
        let mut players = Vec::with_capacity(names.len());
        for name in names {
            let player = Player::new(name.as_str());
            tx.execute(
                "INSERT INTO players (id, name) VALUES (?1, ?2)",
                params![player.id, player.name],
            )?;
            tx.execute(
                "INSERT INTO scorecards (tournament_id, player_id) VALUES (?1, ?2)",
                params![tournament, player.id],
            )?;
            players.push(player);
        }
        tx.commit()?;
        Ok(players)
    }

    fn count_players(&self, tournament: TournamentId) -> Result<usize, TournamentError> {
        self.require_tournament(tournament)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM scorecards WHERE tournament_id = ?1",
            params![tournament],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn delete_matches(&mut self, tournament: TournamentId) -> Result<usize, TournamentError> {
        self.require_tournament(tournament)?;
        let deleted = self
            .conn
            .execute("DELETE FROM matches WHERE tournament_id = ?1", params![tournament])?;
        Ok(deleted)
    }

    fn delete_scorecards(&mut self, tournament: TournamentId) -> Result<usize, TournamentError> {
        self.require_tournament(tournament)?;
        let deleted = self
            .conn
            .execute("DELETE FROM scorecards WHERE tournament_id = ?1", params![tournament])?;
        Ok(deleted)
    }

    fn begin(&mut self) -> Result<Box<dyn StoreSession + '_>, TournamentError> {
        Ok(Box::new(SqliteSession {
            tx: self.conn.transaction()?,
        }))
    }
}

/// Wraps one SQLite transaction; rolled back on drop unless committed.
struct SqliteSession<'a> {
    tx: Transaction<'a>,
}

impl StoreSession for SqliteSession<'_> {
    fn scorecard(
        &self,
        tournament: TournamentId,
        player: PlayerId,
    ) -> Result<Option<Scorecard>, TournamentError> {
        read_scorecard(&self.tx, tournament, player)
    }

    fn add_to_scorecard(
        &mut self,
        tournament: TournamentId,
        player: PlayerId,
        delta: ScoreDelta,
    ) -> Result<(), TournamentError> {
        let updated = self.tx.execute(
            "UPDATE scorecards
             SET score = score + ?1, played = played + ?2, bye_count = bye_count + ?3
             WHERE tournament_id = ?4 AND player_id = ?5",
            params![delta.score, delta.played, delta.byes, tournament, player],
        )?;
        if updated == 0 {
            return Err(TournamentError::ScorecardNotFound { tournament, player });
        }
        Ok(())
    }

    fn insert_match(&mut self, record: &MatchRecord) -> Result<(), TournamentError> {
        self.tx.execute(
            "INSERT INTO matches (id, tournament_id, winner, loser, is_draw, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.tournament_id,
                record.winner,
                record.loser,
                record.is_draw,
                record.recorded_at
            ],
        )?;
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), TournamentError> {
        let session = *self;
        session.tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;

    #[test]
    fn bulk_registration_failing_midway_registers_nobody() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let t = store.create_tournament("Bulk").unwrap().id;
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_name BEFORE INSERT ON players
                 WHEN NEW.name = 'Rejected'
                 BEGIN SELECT RAISE(ABORT, 'name rejected'); END;",
            )
            .unwrap();

        let names = ["Joe Malik", "Atlanta Hope", "Rejected"].map(String::from);
        let err = store.register_players(t, &names).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        assert_eq!(store.count_players(t).unwrap(), 0);
        let players: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .unwrap();
        assert_eq!(players, 0);

        let names = ["Joe Malik", "Atlanta Hope"].map(String::from);
        assert_eq!(store.register_players(t, &names).unwrap().len(), 2);
        assert_eq!(store.count_players(t).unwrap(), 2);
    }
}
