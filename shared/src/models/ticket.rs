//! Queue Ticket Model

use serde::{Deserialize, Serialize};

/// Ticket lifecycle status
///
/// `IN_QUEUE → PLAYED`, `IN_QUEUE → EXPIRED`, `AVAILABLE → IN_QUEUE`
/// (redemption). No other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    InQueue,
    Played,
    Expired,
    Available,
}

/// Queue ticket — `number` comes from the persisted sequence counter,
/// globally unique, strictly increasing, never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: i64,
    /// Sequence number shown on the now-serving display
    pub number: i64,
    pub player_id: i64,
    pub status: TicketStatus,
    pub issued_at: i64,
    pub updated_at: i64,
}

/// Issue ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketIssue {
    pub player_id: i64,
}

/// Refund payload — creates fresh AVAILABLE tickets for future redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRefund {
    pub player_id: i64,
    pub count: i64,
}
