//! Scoring API 模块 (计分 / 回合)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/scores", post(handler::log_score))
        .route("/api/turns", post(handler::log_turn))
        .route("/api/turns/{id}", get(handler::get_turn_participant))
        .route("/api/leaderboard", get(handler::global_feed))
}
