//! Competition Model

use serde::{Deserialize, Serialize};

/// Competition kind — tagged variant, one scoring handler per kind.
///
/// `Individual` and `Team` go through the scoring engine;
/// `Match` and `Solo` go through the turn tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum CompetitionKind {
    Individual,
    Team,
    Match,
    Solo,
}

/// Competition lifecycle status (one-directional transitions)
///
/// `DRAFT → ACTIVE → ENDED`, with `DRAFT|ACTIVE → CANCELLED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum CompetitionStatus {
    Draft,
    Active,
    Ended,
    Cancelled,
}

impl Default for CompetitionStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Competition entity — never physically deleted, only status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub kind: CompetitionKind,
    pub status: CompetitionStatus,
    /// Entry cost in tickets
    pub cost: i64,
    /// Kicks allowed per turn
    pub kicks_per_turn: i64,
    /// Required team size (team competitions only)
    pub team_size: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create competition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionCreate {
    pub name: String,
    pub kind: CompetitionKind,
    #[serde(default)]
    pub cost: i64,
    pub kicks_per_turn: i64,
    pub team_size: Option<i64>,
    /// Initial individual roster, registered in the same transaction
    #[serde(default)]
    pub player_ids: Vec<i64>,
    /// Initial team roster, registered in the same transaction
    #[serde(default)]
    pub team_ids: Vec<i64>,
}
