//! Store wrapper shared by the integration tests: fails every score update for one player.

use swiss_tournament_web::{
    MatchLedger, MatchRecord, Player, PlayerId, RankingEntry, ScoreDelta, Scorecard, ScorecardStore,
    StoreSession, Tournament, TournamentError, TournamentId, TournamentStore,
};

/// Store whose sessions fail every score update for `fail_for`.
pub struct FailingStore<S> {
    pub inner: S,
    pub fail_for: PlayerId,
}

struct FailingSession<'a> {
    inner: Box<dyn StoreSession + 'a>,
    fail_for: PlayerId,
}

impl StoreSession for FailingSession<'_> {
    fn scorecard(&self, t: TournamentId, p: PlayerId) -> Result<Option<Scorecard>, TournamentError> {
        self.inner.scorecard(t, p)
    }

    fn add_to_scorecard(&mut self, t: TournamentId, p: PlayerId, delta: ScoreDelta) -> Result<(), TournamentError> {
        if p == self.fail_for {
            return Err(TournamentError::InvalidInput("simulated write failure".to_string()));
        }
        self.inner.add_to_scorecard(t, p, delta)
    }

    fn insert_match(&mut self, record: &MatchRecord) -> Result<(), TournamentError> {
        self.inner.insert_match(record)
    }

    fn commit(self: Box<Self>) -> Result<(), TournamentError> {
        let session = *self;
        session.inner.commit()
    }
}

impl<S: TournamentStore> ScorecardStore for FailingStore<S> {
    fn scorecard(&self, t: TournamentId, p: PlayerId) -> Result<Option<Scorecard>, TournamentError> {
        self.inner.scorecard(t, p)
    }

    fn ranked_scorecards(&self, t: TournamentId) -> Result<Vec<RankingEntry>, TournamentError> {
        self.inner.ranked_scorecards(t)
    }
}

impl<S: TournamentStore> MatchLedger for FailingStore<S> {
    fn have_played(&self, t: TournamentId, a: PlayerId, b: PlayerId) -> Result<bool, TournamentError> {
        self.inner.have_played(t, a, b)
    }

    fn matches(&self, t: TournamentId) -> Result<Vec<MatchRecord>, TournamentError> {
        self.inner.matches(t)
    }
}

impl<S: TournamentStore> TournamentStore for FailingStore<S> {
    fn create_tournament(&mut self, name: &str) -> Result<Tournament, TournamentError> {
        self.inner.create_tournament(name)
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError> {
        self.inner.tournament(id)
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        self.inner.delete_tournament(id)
    }

    fn register_player(&mut self, t: TournamentId, name: &str) -> Result<Player, TournamentError> {
        self.inner.register_player(t, name)
    }

    fn register_players(&mut self, t: TournamentId, names: &[String]) -> Result<Vec<Player>, TournamentError> {
        self.inner.register_players(t, names)
    }

    fn count_players(&self, t: TournamentId) -> Result<usize, TournamentError> {
        self.inner.count_players(t)
    }

    fn delete_matches(&mut self, t: TournamentId) -> Result<usize, TournamentError> {
        self.inner.delete_matches(t)
    }

    fn delete_scorecards(&mut self, t: TournamentId) -> Result<usize, TournamentError> {
        self.inner.delete_scorecards(t)
    }

    fn begin(&mut self) -> Result<Box<dyn StoreSession + '_>, TournamentError> {
        let fail_for = self.fail_for;
        let inner = self.inner.begin()?;
        Ok(Box::new(FailingSession { inner, fail_for }))
    }
}
