//! Raffle API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::auth::{AdminGuard, CurrentStaff};
use crate::core::ServerState;
use crate::db::repository::raffle;
use crate::utils::{AppResult, time};
use shared::models::{RaffleDraw, RaffleDrawRequest};

/// POST /api/raffle/draws - 抽奖 (管理员)
///
/// Date → `[start, end)` millis conversion happens here, in the venue
/// timezone; the repository only sees the bounds.
pub async fn draw(
    State(state): State<ServerState>,
    _admin: AdminGuard,
    staff: CurrentStaff,
    Json(payload): Json<RaffleDrawRequest>,
) -> AppResult<Json<RaffleDraw>> {
    let tz = state.config.timezone;
    let date = time::parse_date(&payload.date)?;

    let winner = raffle::draw(
        &state.pool,
        &date.to_string(),
        time::day_start_millis(date, tz),
        time::day_end_millis(date, tz),
        payload.exclude_previous_winners,
    )
    .await?;

    tracing::info!(
        target: "raffle",
        date = %winner.draw_date,
        draw = winner.draw_number,
        staff = staff.id,
        "raffle drawn"
    );
    state.notifier.notify("raffle_winner", winner.clone());
    Ok(Json(winner))
}

/// Query params for listing draws
#[derive(Debug, Deserialize)]
pub struct DrawsQuery {
    /// YYYY-MM-DD，缺省为今天 (场馆时区)
    pub date: Option<String>,
}

/// GET /api/raffle/draws?date= - 当日抽奖记录
pub async fn list_draws(
    State(state): State<ServerState>,
    Query(query): Query<DrawsQuery>,
) -> AppResult<Json<Vec<RaffleDraw>>> {
    let date = match query.date {
        Some(d) => time::parse_date(&d)?,
        None => time::current_venue_date(state.config.timezone),
    };
    let draws = raffle::list_draws(&state.pool, &date.to_string()).await?;
    Ok(Json(draws))
}
