//! Scoring API Handlers
//!
//! 两条互不相通的计分路径：
//! - `/api/scores` — individual/team 比赛，事务内更新三个面
//! - `/api/turns` — match/solo 回合制，额度递减

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::repository::{leaderboard, scoring, turn};
use crate::utils::validation::{MAX_NOTE_LEN, validate_count, validate_optional_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{LeaderboardEntry, ScoreLog, ScoreOutcome, TurnLog, TurnOutcome, TurnParticipant};

/// POST /api/scores - 记录一次计分
pub async fn log_score(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<ScoreLog>,
) -> AppResult<Json<ScoreOutcome>> {
    validate_count(payload.kicks_used, "kicks_used")?;
    validate_count(payload.goals, "goals")?;
    if let Some(run) = payload.consecutive_run {
        validate_count(run, "consecutive_run")?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let outcome = scoring::log_score(&state.pool, staff.id, payload).await?;
    Ok(Json(outcome))
}

/// POST /api/turns - 记录一个回合
pub async fn log_turn(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<TurnLog>,
) -> AppResult<Json<TurnOutcome>> {
    validate_count(payload.kicks_used, "kicks_used")?;
    validate_count(payload.goals, "goals")?;

    let outcome = turn::log_turn(&state.pool, payload).await?;
    tracing::info!(
        target: "scoring",
        staff = staff.id,
        kicks_remaining = outcome.kicks_remaining,
        "turn logged"
    );
    Ok(Json(outcome))
}

/// GET /api/turns/:id - 回合参赛者状态
pub async fn get_turn_participant(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TurnParticipant>> {
    let p = turn::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Turn participant {id} not found")))?;
    Ok(Json(p))
}

/// Query params for the venue-wide feed
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// YYYY-MM-DD (场馆时区)，缺省为今天
    pub date: Option<String>,
}

/// GET /api/leaderboard?date= - 全场当日榜单 (镜像行)
pub async fn global_feed(
    State(state): State<ServerState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    let tz = state.config.timezone;
    let date = match query.date {
        Some(d) => time::parse_date(&d)?,
        None => time::current_venue_date(tz),
    };
    let entries = leaderboard::global_feed(
        &state.pool,
        time::day_start_millis(date, tz),
        time::day_end_millis(date, tz),
    )
    .await?;
    Ok(Json(entries))
}
