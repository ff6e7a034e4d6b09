//! Queue API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::{AdminGuard, CurrentStaff};
use crate::core::ServerState;
use crate::db::repository::ticket;
use crate::utils::validation::MAX_REFUND_COUNT;
use crate::utils::{AppError, AppResult};
use shared::models::{Ticket, TicketIssue, TicketRefund, TicketStatus};

/// Query params for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<TicketStatus>,
    pub player_id: Option<i64>,
}

/// POST /api/queue/tickets - 发号
pub async fn issue(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<TicketIssue>,
) -> AppResult<Json<Ticket>> {
    let t = ticket::issue(&state.pool, payload.player_id).await?;
    tracing::info!(
        target: "queue",
        ticket = t.number,
        player = t.player_id,
        staff = staff.id,
        "ticket issued"
    );
    Ok(Json(t))
}

/// GET /api/queue/current - 当前叫号 (队首)
pub async fn current(State(state): State<ServerState>) -> AppResult<Json<Option<Ticket>>> {
    let head = ticket::current_position(&state.pool).await?;
    Ok(Json(head))
}

/// GET /api/queue/tickets?status=&player_id= - 票列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = if let Some(player_id) = query.player_id {
        ticket::list_by_player(&state.pool, player_id).await?
    } else {
        // Default view is the live queue
        let status = query.status.unwrap_or(TicketStatus::InQueue);
        ticket::list(&state.pool, status).await?
    };
    Ok(Json(tickets))
}

/// POST /api/queue/tickets/:id/played - 已上场
pub async fn mark_played(
    State(state): State<ServerState>,
    _staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<Ticket>> {
    let t = ticket::mark_played(&state.pool, id).await?;
    Ok(Json(t))
}

/// POST /api/queue/tickets/:id/expired - 过号作废
pub async fn mark_expired(
    State(state): State<ServerState>,
    _staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<Ticket>> {
    let t = ticket::mark_expired(&state.pool, id).await?;
    Ok(Json(t))
}

/// POST /api/queue/tickets/:id/redeem - 兑换退票
pub async fn redeem(
    State(state): State<ServerState>,
    _staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<Ticket>> {
    let t = ticket::redeem(&state.pool, id).await?;
    Ok(Json(t))
}

#[derive(Serialize)]
pub struct ExpireDayResult {
    pub expired: u64,
}

/// POST /api/queue/expire-day - 收市批量作废 (管理员)
pub async fn expire_day(
    State(state): State<ServerState>,
    _admin: AdminGuard,
    staff: CurrentStaff,
) -> AppResult<Json<ExpireDayResult>> {
    let expired = ticket::expire_end_of_day(&state.pool).await?;
    tracing::info!(target: "queue", expired, staff = staff.id, "end-of-day expiry");
    Ok(Json(ExpireDayResult { expired }))
}

/// POST /api/queue/refunds - 退票 (生成待兑换票)
pub async fn refund(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<TicketRefund>,
) -> AppResult<Json<Vec<Ticket>>> {
    if payload.count <= 0 || payload.count > MAX_REFUND_COUNT {
        return Err(AppError::validation(format!(
            "count must be between 1 and {MAX_REFUND_COUNT}, got {}",
            payload.count
        )));
    }
    let tickets = ticket::refund(&state.pool, payload.player_id, payload.count).await?;
    tracing::info!(
        target: "queue",
        player = payload.player_id,
        count = payload.count,
        staff = staff.id,
        "tickets refunded"
    );
    Ok(Json(tickets))
}
