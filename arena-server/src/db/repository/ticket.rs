//! Queue Ticket Repository
//!
//! Lifecycle: `IN_QUEUE → PLAYED`, `IN_QUEUE → EXPIRED`,
//! `AVAILABLE → IN_QUEUE` (redemption). All transitions are guarded
//! UPDATEs — a lost race shows up as 0 rows affected, never as a
//! clobbered status.

use super::{RepoError, RepoResult, sequence};
use shared::models::{Ticket, TicketStatus};
use sqlx::SqlitePool;

const TICKET_COLS: &str = "id, number, player_id, status, issued_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ticket>> {
    let ticket = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLS} FROM ticket WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(ticket)
}

/// Allocate the next sequence number and create an IN_QUEUE ticket,
/// both in one transaction.
pub async fn issue(pool: &SqlitePool, player_id: i64) -> RepoResult<Ticket> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let number = sequence::next_ticket_number(&mut *tx).await?;
    let ticket = sqlx::query_as::<_, Ticket>(&format!(
        "INSERT INTO ticket (number, player_id, status, issued_at, updated_at) VALUES (?1, ?2, 'IN_QUEUE', ?3, ?3) RETURNING {TICKET_COLS}"
    ))
    .bind(number)
    .bind(player_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(ticket)
}

/// Head of queue: the lowest-numbered ticket still IN_QUEUE.
pub async fn current_position(pool: &SqlitePool) -> RepoResult<Option<Ticket>> {
    let ticket = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLS} FROM ticket WHERE status = 'IN_QUEUE' ORDER BY number ASC LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;
    Ok(ticket)
}

/// List tickets by status, ascending ticket number.
pub async fn list(pool: &SqlitePool, status: TicketStatus) -> RepoResult<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLS} FROM ticket WHERE status = ? ORDER BY number ASC"
    ))
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(tickets)
}

pub async fn list_by_player(pool: &SqlitePool, player_id: i64) -> RepoResult<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLS} FROM ticket WHERE player_id = ? ORDER BY number ASC"
    ))
    .bind(player_id)
    .fetch_all(pool)
    .await?;
    Ok(tickets)
}

pub async fn mark_played(pool: &SqlitePool, id: i64) -> RepoResult<Ticket> {
    transition(pool, id, "IN_QUEUE", "PLAYED").await
}

pub async fn mark_expired(pool: &SqlitePool, id: i64) -> RepoResult<Ticket> {
    transition(pool, id, "IN_QUEUE", "EXPIRED").await
}

/// AVAILABLE → IN_QUEUE when a refunded ticket is redeemed.
/// The redemption flow itself is external; this is just the transition.
pub async fn redeem(pool: &SqlitePool, id: i64) -> RepoResult<Ticket> {
    transition(pool, id, "AVAILABLE", "IN_QUEUE").await
}

/// Guarded one-way transition; diagnoses 0-rows into NotFound vs InvalidState.
async fn transition(pool: &SqlitePool, id: i64, from: &str, to: &str) -> RepoResult<Ticket> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE ticket SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(to)
        .bind(now)
        .bind(id)
        .bind(from)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Ticket {id} not found"))),
            Some(t) => Err(RepoError::InvalidState(format!(
                "Ticket {id} is {:?}, cannot move to {to}",
                t.status
            ))),
        };
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Ticket {id} vanished after update")))
}

/// Bulk IN_QUEUE → EXPIRED at close of the operating day.
///
/// Idempotent: a second call finds nothing in queue and expires 0.
pub async fn expire_end_of_day(pool: &SqlitePool) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE ticket SET status = 'EXPIRED', updated_at = ?1 WHERE status = 'IN_QUEUE'")
        .bind(now)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Create `count` fresh AVAILABLE tickets for a cancelled registration.
///
/// These are new tickets for future redemption, each with its own
/// sequence number — old tickets are never re-activated.
pub async fn refund(pool: &SqlitePool, player_id: i64, count: i64) -> RepoResult<Vec<Ticket>> {
    if count <= 0 {
        return Err(RepoError::Validation(format!(
            "Refund count must be positive, got {count}"
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let mut tickets = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let number = sequence::next_ticket_number(&mut *tx).await?;
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "INSERT INTO ticket (number, player_id, status, issued_at, updated_at) VALUES (?1, ?2, 'AVAILABLE', ?3, ?3) RETURNING {TICKET_COLS}"
        ))
        .bind(number)
        .bind(player_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tickets.push(ticket);
    }

    tx.commit().await?;
    Ok(tickets)
}
