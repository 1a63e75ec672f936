//! Tournament and TournamentError.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Player {player} is not registered in tournament {tournament}")]
    ScorecardNotFound {
        tournament: TournamentId,
        player: PlayerId,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every player in the field already holds a bye.
    #[error("No player is eligible for a bye; the round cannot be formed automatically")]
    ByesExhausted,

    /// A multi-write outcome did not apply as one unit.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Coarse classification of [`TournamentError`], used by callers to decide how to react.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Exhausted,
    IntegrityViolation,
    Storage,
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::TournamentNotFound(_) | TournamentError::ScorecardNotFound { .. } => {
                ErrorKind::NotFound
            }
            TournamentError::InvalidInput(_) => ErrorKind::InvalidInput,
            TournamentError::ByesExhausted => ErrorKind::Exhausted,
            TournamentError::IntegrityViolation(_) => ErrorKind::IntegrityViolation,
            TournamentError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// A tournament. Players join it through registration, which creates their scorecard row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
