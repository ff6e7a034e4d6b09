//! Shared types for the KickArena venue engine
//!
//! Data models used by the server and its API consumers.
//! DB row types derive `sqlx::FromRow` behind the `db` feature.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
