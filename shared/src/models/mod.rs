//! Data models
//!
//! Shared between arena-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod activity;
pub mod competition;
pub mod leaderboard;
pub mod participant;
pub mod raffle;
pub mod scoring;
pub mod ticket;
pub mod turn;

// Re-exports
pub use activity::*;
pub use competition::*;
pub use leaderboard::*;
pub use participant::*;
pub use raffle::*;
pub use scoring::*;
pub use ticket::*;
pub use turn::*;
