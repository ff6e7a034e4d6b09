//! Participant / Team Registry Models

use serde::{Deserialize, Serialize};

/// Participant — a player's scoring record within one competition.
///
/// Counters only ever increase. At most one row per (competition, player);
/// `team_id` is set on the team path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Participant {
    pub id: i64,
    pub competition_id: i64,
    pub player_id: i64,
    pub team_id: Option<i64>,
    pub goals: i64,
    pub kicks_taken: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Team registration within a team competition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TeamEntry {
    pub id: i64,
    pub competition_id: i64,
    pub team_id: i64,
    pub created_at: i64,
}

/// Active-roster status for oversized teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum RosterStatus {
    Active,
    Inactive,
}

/// One roster row per (competition, team, player) — exactly one state
/// authoritative at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ActiveRosterEntry {
    pub id: i64,
    pub competition_id: i64,
    pub team_id: i64,
    pub player_id: i64,
    pub status: RosterStatus,
    pub updated_at: i64,
}

/// Running team aggregate, scoped to a competition.
///
/// Expected to stay consistent with the sum of the team's participant
/// rows; the two are written by separate statements in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TeamStats {
    pub id: i64,
    pub team_id: i64,
    pub competition_id: i64,
    pub total_goals: i64,
    pub total_attempts: i64,
    pub updated_at: i64,
}

/// Set active roster payload — full replace, not a merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveRosterSet {
    pub player_ids: Vec<i64>,
}
