//! Scoring Event Models

use serde::{Deserialize, Serialize};

use super::Participant;

/// Staff-logged scoring event ("N goals from M kicks for player P").
///
/// `goals > kicks_used` is accepted — the engine records what staff
/// report rather than second-guessing the count at the goal mouth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLog {
    pub competition_id: i64,
    pub player_id: i64,
    /// Team path: explicit target team; when absent the team is resolved
    /// from the competition's roster
    pub team_id: Option<i64>,
    pub kicks_used: i64,
    #[serde(default)]
    pub goals: i64,
    /// Longest consecutive-goal run, when counted
    pub consecutive_run: Option<i64>,
    pub notes: Option<String>,
}

/// Result of a logged scoring event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub participant: Participant,
    /// True when a global leaderboard mirror entry was written (goals > 0)
    pub leaderboard_recorded: bool,
}
