//! Competition API 模块 (比赛管理)

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/competitions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/start", post(handler::start))
        .route("/{id}/end", post(handler::end))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/participants", post(handler::add_participant))
        .route("/{id}/teams", post(handler::add_team))
        .route(
            "/{id}/teams/{team_id}/active-roster",
            put(handler::set_active_roster).get(handler::get_roster),
        )
        .route("/{id}/leaderboard", get(handler::leaderboard))
        .route("/{id}/team-leaderboard", get(handler::team_leaderboard))
        .route("/{id}/match-scores", get(handler::match_scores))
        .route("/{id}/activity", get(handler::activity))
}
