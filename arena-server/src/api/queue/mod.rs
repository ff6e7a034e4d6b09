//! Queue API 模块 (排队叫号)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/queue", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/tickets", get(handler::list).post(handler::issue))
        .route("/current", get(handler::current))
        .route("/tickets/{id}/played", post(handler::mark_played))
        .route("/tickets/{id}/expired", post(handler::mark_expired))
        .route("/tickets/{id}/redeem", post(handler::redeem))
        .route("/expire-day", post(handler::expire_day))
        .route("/refunds", post(handler::refund))
}
