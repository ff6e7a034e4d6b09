//! Raffle Draw Model

use serde::{Deserialize, Serialize};

/// One raffle selection for a calendar day.
///
/// `(draw_date, draw_number)` is unique; a day may have multiple draws.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RaffleDraw {
    pub id: i64,
    /// Venue-local calendar day, `YYYY-MM-DD`
    pub draw_date: String,
    /// 1-based, increments per draw within the day
    pub draw_number: i64,
    pub ticket_id: i64,
    pub ticket_number: i64,
    pub player_id: i64,
    pub drawn_at: i64,
}

/// Draw request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaffleDrawRequest {
    /// Calendar day to draw for, `YYYY-MM-DD` (venue timezone)
    pub date: String,
    /// Caller policy: drop tickets that already won an earlier draw today
    #[serde(default)]
    pub exclude_previous_winners: bool,
}
