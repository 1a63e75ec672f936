//! Player, Scorecard and the ranking projection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Points for a decisive win.
pub const WIN_POINTS: u32 = 3;
/// Points each player gets for a draw.
pub const DRAW_POINTS: u32 = 1;
/// Points credited for a bye.
pub const BYE_POINTS: u32 = 3;

/// A registered player. Immutable after registration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with a fresh id. The name is stored as given.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Per-tournament standing of one player. Counters only ever grow.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: u32,
    /// Head-to-head matches only; byes are not counted here.
    pub played: u32,
    pub bye_count: u32,
}

impl Scorecard {
    pub fn apply(&mut self, delta: ScoreDelta) {
        self.score += delta.score;
        self.played += delta.played;
        self.bye_count += delta.byes;
    }
}

/// Additive change to a scorecard row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScoreDelta {
    pub score: u32,
    pub played: u32,
    pub byes: u32,
}

impl ScoreDelta {
    pub const WIN: Self = Self {
        score: WIN_POINTS,
        played: 1,
        byes: 0,
    };
    pub const LOSS: Self = Self {
        score: 0,
        played: 1,
        byes: 0,
    };
    pub const DRAW: Self = Self {
        score: DRAW_POINTS,
        played: 1,
        byes: 0,
    };
    pub const BYE: Self = Self {
        score: BYE_POINTS,
        played: 0,
        byes: 1,
    };
}

/// Read-only projection of a scorecard row joined with the player name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
    pub played: u32,
    pub bye_count: u32,
}

impl RankingEntry {
    pub fn new(player: &Player, card: Scorecard) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            score: card.score,
            played: card.played,
            bye_count: card.bye_count,
        }
    }

    pub fn has_bye(&self) -> bool {
        self.bye_count > 0
    }
}

/// Stable sort into standing order: score desc, then played desc. Ties keep their order.
pub fn rank(entries: &mut [RankingEntry]) {
    entries.sort_by(standing_order);
}

fn standing_order(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.score.cmp(&a.score).then(b.played.cmp(&a.played))
}

/// Clean a free-text name before it reaches storage: trim, reject empty, escape HTML.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    Some(out)
}
