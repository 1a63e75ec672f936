//! In-process store. Useful for tests and for embedding without a database file.

use std::collections::HashMap;

use crate::models::{
    rank, MatchRecord, Player, PlayerId, RankingEntry, ScoreDelta, Scorecard, Tournament,
    TournamentError, TournamentId,
};
use crate::store::{MatchLedger, ScorecardStore, StoreSession, TournamentStore};

#[derive(Clone, Debug)]
struct ScorecardRow {
    player_id: PlayerId,
    card: Scorecard,
}

#[derive(Debug, Default)]
struct Tables {
    tournaments: HashMap<TournamentId, Tournament>,
    players: HashMap<PlayerId, Player>,
    /// Rows per tournament, kept in registration order.
    scorecards: HashMap<TournamentId, Vec<ScorecardRow>>,
    matches: HashMap<TournamentId, Vec<MatchRecord>>,
}

impl Tables {
    fn card(&self, tournament: TournamentId, player: PlayerId) -> Option<Scorecard> {
        self.scorecards
            .get(&tournament)?
            .iter()
            .find(|row| row.player_id == player)
            .map(|row| row.card)
    }

    fn card_mut(&mut self, tournament: TournamentId, player: PlayerId) -> Option<&mut Scorecard> {
        self.scorecards
            .get_mut(&tournament)?
            .iter_mut()
            .find(|row| row.player_id == player)
            .map(|row| &mut row.card)
    }

    fn require_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        if self.tournaments.contains_key(&id) {
            Ok(())
        } else {
            Err(TournamentError::TournamentNotFound(id))
        }
    }
}

/// Store backed by plain maps. Not durable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScorecardStore for MemoryStore {
    fn scorecard(
        &self,
        tournament: TournamentId,
        player: PlayerId,
    ) -> Result<Option<Scorecard>, TournamentError> {
        Ok(self.tables.card(tournament, player))
    }

    fn ranked_scorecards(&self, tournament: TournamentId) -> Result<Vec<RankingEntry>, TournamentError> {
        let rows = match self.tables.scorecards.get(&tournament) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let player = self.tables.players.get(&row.player_id).ok_or_else(|| {
                TournamentError::IntegrityViolation(format!(
                    "scorecard references unknown player {}",
                    row.player_id
                ))
            })?;
            entries.push(RankingEntry::new(player, row.card));
        }
        rank(&mut entries);
        Ok(entries)
    }
}

impl MatchLedger for MemoryStore {
    fn have_played(
        &self,
        tournament: TournamentId,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<bool, TournamentError> {
        Ok(self
            .tables
            .matches
            .get(&tournament)
            .is_some_and(|records| records.iter().any(|m| m.is_between(a, b))))
    }

    fn matches(&self, tournament: TournamentId) -> Result<Vec<MatchRecord>, TournamentError> {
        Ok(self.tables.matches.get(&tournament).cloned().unwrap_or_default())
    }
}

impl TournamentStore for MemoryStore {
    fn create_tournament(&mut self, name: &str) -> Result<Tournament, TournamentError> {
        let tournament = Tournament::new(name);
        self.tables.tournaments.insert(tournament.id, tournament.clone());
        Ok(tournament)
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError> {
        Ok(self.tables.tournaments.get(&id).cloned())
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        self.tables.require_tournament(id)?;
        self.tables.matches.remove(&id);
        self.tables.scorecards.remove(&id);
        self.tables.tournaments.remove(&id);
        Ok(())
    }

    fn register_player(&mut self, tournament: TournamentId, name: &str) -> Result<Player, TournamentError> {
        self.tables.require_tournament(tournament)?;
        let player = Player::new(name);
        self.tables.players.insert(player.id, player.clone());
        self.tables
            .scorecards
            .entry(tournament)
            .or_default()
            .push(ScorecardRow {
                player_id: player.id,
                card: Scorecard::default(),
            });
        Ok(player)
    }

    fn register_players(
        &mut self,
        tournament: TournamentId,
        names: &[String],
    ) -> Result<Vec<Player>, TournamentError> {
        self.tables.require_tournament(tournament)?;
        // Nothing below can fail once the tournament is known.
        let mut players = Vec::with_capacity(names.len());
        for name in names {
            players.push(self.register_player(tournament, name)?);
        }
        Ok(players)
    }

    fn count_players(&self, tournament: TournamentId) -> Result<usize, TournamentError> {
        self.tables.require_tournament(tournament)?;
        Ok(self.tables.scorecards.get(&tournament).map_or(0, Vec::len))
    }

    fn delete_matches(&mut self, tournament: TournamentId) -> Result<usize, TournamentError> {
        self.tables.require_tournament(tournament)?;
        Ok(self.tables.matches.remove(&tournament).map_or(0, |m| m.len()))
    }

    fn delete_scorecards(&mut self, tournament: TournamentId) -> Result<usize, TournamentError> {
        self.tables.require_tournament(tournament)?;
        Ok(self.tables.scorecards.remove(&tournament).map_or(0, |r| r.len()))
    }

    fn begin(&mut self) -> Result<Box<dyn StoreSession + '_>, TournamentError> {
        Ok(Box::new(MemorySession {
            tables: &mut self.tables,
            staged: Vec::new(),
        }))
    }
}

#[derive(Debug)]
enum StagedWrite {
    Score {
        tournament: TournamentId,
        player: PlayerId,
        delta: ScoreDelta,
    },
    Match(MatchRecord),
}

/// Buffers writes; nothing touches the tables until `commit`.
struct MemorySession<'a> {
    tables: &'a mut Tables,
    staged: Vec<StagedWrite>,
}

impl StoreSession for MemorySession<'_> {
    fn scorecard(
        &self,
        tournament: TournamentId,
        player: PlayerId,
    ) -> Result<Option<Scorecard>, TournamentError> {
        let Some(mut card) = self.tables.card(tournament, player) else {
            return Ok(None);
        };
        for write in &self.staged {
            if let StagedWrite::Score {
                tournament: t,
                player: p,
                delta,
            } = write
            {
                if *t == tournament && *p == player {
                    card.apply(*delta);
                }
            }
        }
        Ok(Some(card))
    }

    fn add_to_scorecard(
        &mut self,
        tournament: TournamentId,
        player: PlayerId,
        delta: ScoreDelta,
    ) -> Result<(), TournamentError> {
        if self.tables.card(tournament, player).is_none() {
            return Err(TournamentError::ScorecardNotFound { tournament, player });
        }
        self.staged.push(StagedWrite::Score {
            tournament,
            player,
            delta,
        });
        Ok(())
    }

    fn insert_match(&mut self, record: &MatchRecord) -> Result<(), TournamentError> {
        self.tables.require_tournament(record.tournament_id)?;
        self.staged.push(StagedWrite::Match(record.clone()));
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), TournamentError> {
        let MemorySession { tables, staged } = *self;

        // Validate everything first so the apply loop below cannot stop half way.
        for write in &staged {
            match write {
                StagedWrite::Score {
                    tournament, player, ..
                } => {
                    if tables.card(*tournament, *player).is_none() {
                        return Err(TournamentError::IntegrityViolation(format!(
                            "scorecard row ({tournament}, {player}) disappeared before commit"
                        )));
                    }
                }
                StagedWrite::Match(record) => {
                    if !tables.tournaments.contains_key(&record.tournament_id) {
                        return Err(TournamentError::IntegrityViolation(format!(
                            "tournament {} disappeared before commit",
                            record.tournament_id
                        )));
                    }
                }
            }
        }

        for write in staged {
            match write {
                StagedWrite::Score {
                    tournament,
                    player,
                    delta,
                } => {
                    if let Some(card) = tables.card_mut(tournament, player) {
                        card.apply(delta);
                    }
                }
                StagedWrite::Match(record) => {
                    tables
                        .matches
                        .entry(record.tournament_id)
                        .or_default()
                        .push(record);
                }
            }
        }
        Ok(())
    }
}
