//! Activity Log Model

use serde::{Deserialize, Serialize};

/// Immutable audit row per scoring event.
///
/// Diagnostic, not authoritative: a failed append never rolls back the
/// scoring update that caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ActivityEntry {
    pub id: i64,
    pub competition_id: i64,
    pub staff_id: i64,
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub goals: i64,
    pub kicks_used: i64,
    /// Longest consecutive-goal run within the turn, when the staff
    /// member counted one
    pub consecutive_run: Option<i64>,
    pub notes: Option<String>,
    pub logged_at: i64,
}

/// Payload for an activity append (written by the scoring paths)
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub competition_id: i64,
    pub staff_id: i64,
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub goals: i64,
    pub kicks_used: i64,
    pub consecutive_run: Option<i64>,
    pub notes: Option<String>,
}
