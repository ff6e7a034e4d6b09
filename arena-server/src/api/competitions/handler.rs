//! Competition API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::repository::{activity, competition, leaderboard, registry, turn};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{
    ActiveRosterEntry, ActiveRosterSet, ActivityEntry, Competition, CompetitionCreate,
    MatchScore, Participant, StandingsRow, TeamEntry, TeamStats,
};

/// Query params for listing competitions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/competitions - 比赛列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Competition>>> {
    let comps = competition::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(comps))
}

/// GET /api/competitions/:id - 单个比赛
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Competition>> {
    let comp = competition::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Competition {id} not found")))?;
    Ok(Json(comp))
}

/// POST /api/competitions - 创建比赛 (含初始名单)
pub async fn create(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<CompetitionCreate>,
) -> AppResult<Json<Competition>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.cost < 0 {
        return Err(AppError::validation(format!(
            "cost must be non-negative, got {}",
            payload.cost
        )));
    }

    let comp = competition::create(&state.pool, payload).await?;
    tracing::info!(
        target: "competition",
        id = comp.id,
        name = %comp.name,
        staff = staff.id,
        "competition created"
    );
    Ok(Json(comp))
}

/// POST /api/competitions/:id/start - 开赛
pub async fn start(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<Competition>> {
    let comp = competition::start(&state.pool, id).await?;
    tracing::info!(target: "competition", id, staff = staff.id, "competition started");
    state.notifier.notify("competition_started", comp.clone());
    Ok(Json(comp))
}

/// POST /api/competitions/:id/end - 结束
pub async fn end(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<Competition>> {
    let comp = competition::end(&state.pool, id).await?;
    tracing::info!(target: "competition", id, staff = staff.id, "competition ended");
    state.notifier.notify("competition_ended", comp.clone());
    Ok(Json(comp))
}

/// POST /api/competitions/:id/cancel - 取消
pub async fn cancel(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<Competition>> {
    let comp = competition::cancel(&state.pool, id).await?;
    tracing::info!(target: "competition", id, staff = staff.id, "competition cancelled");
    Ok(Json(comp))
}

#[derive(Debug, Deserialize)]
pub struct AddParticipant {
    pub player_id: i64,
    /// Match/solo play: which team the player kicks for, if any
    pub team_id: Option<i64>,
}

/// POST /api/competitions/:id/participants - 报名
///
/// individual 比赛进 participant 表；match/solo 进 turn_participant
/// (带踢球额度)。team 比赛请用 /teams。
pub async fn add_participant(
    State(state): State<ServerState>,
    _staff: CurrentStaff,
    Path(id): Path<i64>,
    Json(payload): Json<AddParticipant>,
) -> AppResult<Json<serde_json::Value>> {
    use shared::models::CompetitionKind;

    let comp = competition::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Competition {id} not found")))?;

    let body = match comp.kind {
        CompetitionKind::Individual => {
            let p: Participant =
                registry::add_individual_participant(&state.pool, id, payload.player_id).await?;
            serde_json::to_value(p)
        }
        CompetitionKind::Match | CompetitionKind::Solo => {
            let p = turn::add_participant(&state.pool, id, payload.player_id, payload.team_id)
                .await?;
            serde_json::to_value(p)
        }
        CompetitionKind::Team => {
            return Err(AppError::invalid_state(
                "Team competitions register teams, not individual participants".to_string(),
            ));
        }
    };
    Ok(Json(body.map_err(|e| AppError::internal(e.to_string()))?))
}

#[derive(Debug, Deserialize)]
pub struct AddTeam {
    pub team_id: i64,
    /// Optional membership to register alongside the entry
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

/// POST /api/competitions/:id/teams - 球队报名
pub async fn add_team(
    State(state): State<ServerState>,
    _staff: CurrentStaff,
    Path(id): Path<i64>,
    Json(payload): Json<AddTeam>,
) -> AppResult<Json<TeamEntry>> {
    let entry = registry::add_team(&state.pool, id, payload.team_id).await?;
    for player_id in &payload.member_ids {
        registry::add_team_member(&state.pool, payload.team_id, *player_id).await?;
    }
    Ok(Json(entry))
}

/// PUT /api/competitions/:id/teams/:team_id/active-roster - 上场名单 (全量替换)
pub async fn set_active_roster(
    State(state): State<ServerState>,
    _staff: CurrentStaff,
    Path((id, team_id)): Path<(i64, i64)>,
    Json(payload): Json<ActiveRosterSet>,
) -> AppResult<Json<Vec<ActiveRosterEntry>>> {
    registry::set_active_roster(&state.pool, id, team_id, &payload.player_ids).await?;
    let roster = registry::list_roster(&state.pool, id, team_id).await?;
    Ok(Json(roster))
}

/// GET /api/competitions/:id/teams/:team_id/active-roster
pub async fn get_roster(
    State(state): State<ServerState>,
    Path((id, team_id)): Path<(i64, i64)>,
) -> AppResult<Json<Vec<ActiveRosterEntry>>> {
    let roster = registry::list_roster(&state.pool, id, team_id).await?;
    Ok(Json(roster))
}

/// GET /api/competitions/:id/leaderboard - 个人榜
pub async fn leaderboard(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<StandingsRow>>> {
    let rows = leaderboard::standings(&state.pool, id).await?;
    Ok(Json(rows))
}

/// GET /api/competitions/:id/team-leaderboard - 团队榜
pub async fn team_leaderboard(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<TeamStats>>> {
    let rows = leaderboard::team_standings(&state.pool, id).await?;
    Ok(Json(rows))
}

/// GET /api/competitions/:id/match-scores - 对抗赛比分
pub async fn match_scores(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MatchScore>>> {
    let scores = turn::match_scores(&state.pool, id).await?;
    Ok(Json(scores))
}

/// Query params for the activity feed
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default = "default_activity_limit")]
    pub limit: i32,
}

fn default_activity_limit() -> i32 {
    100
}

/// GET /api/competitions/:id/activity - 计分动态 (最新在前)
pub async fn activity(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    let entries = activity::find_by_competition(&state.pool, id, query.limit).await?;
    Ok(Json(entries))
}
