//! Raffle API 模块 (每日抽奖)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/raffle", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/draws", get(handler::list_draws).post(handler::draw))
}
