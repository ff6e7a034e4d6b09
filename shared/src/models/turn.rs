//! Match / Solo Turn Tracker Models

use serde::{Deserialize, Serialize};

/// Per-participant turn state for match/solo competitions.
///
/// `kicks_remaining` starts at the competition's allowance and only
/// decreases; `is_active` is false once it reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TurnParticipant {
    pub id: i64,
    pub competition_id: i64,
    pub player_id: i64,
    /// Match play: which side of the head-to-head this player kicks for
    pub team_id: Option<i64>,
    pub kicks_remaining: i64,
    pub total_kicks_used: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One logged turn (kick log record)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct KickLog {
    pub id: i64,
    pub turn_participant_id: i64,
    pub competition_id: i64,
    pub kicks_used: i64,
    pub goals: i64,
    pub logged_at: i64,
}

/// Running per-team score within a match competition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MatchScore {
    pub id: i64,
    pub competition_id: i64,
    pub team_id: i64,
    pub goals: i64,
    pub kicks: i64,
    pub updated_at: i64,
}

/// Log turn payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnLog {
    pub participant_id: i64,
    pub kicks_used: i64,
    #[serde(default)]
    pub goals: i64,
}

/// Result of a logged turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub kicks_remaining: i64,
    /// True when this turn exhausted the allowance
    pub became_inactive: bool,
}
