//! Global Leaderboard Mirror Model

use serde::{Deserialize, Serialize};

/// Denormalized append-only record per scoring event with `goals > 0`.
///
/// Venue-wide leaderboards read this feed independently of any single
/// competition; it mirrors, never replaces, participant state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaderboardEntry {
    pub id: i64,
    pub player_id: i64,
    pub staff_id: i64,
    pub competition_id: i64,
    pub goals: i64,
    pub kicks_used: i64,
    pub is_team_play: bool,
    pub recorded_at: i64,
}

/// Per-competition standings row (computed, not stored)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StandingsRow {
    pub player_id: i64,
    pub team_id: Option<i64>,
    pub goals: i64,
    pub kicks_taken: i64,
}
