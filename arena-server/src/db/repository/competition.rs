//! Competition Repository
//!
//! Competitions are never deleted; they only move forward through
//! `DRAFT → ACTIVE → ENDED`, or sideways to `CANCELLED` before ending.

use super::{RepoError, RepoResult};
use shared::models::{Competition, CompetitionCreate, CompetitionKind};
use sqlx::SqlitePool;

const COMP_COLS: &str = "id, name, kind, status, cost, kicks_per_turn, team_size, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Competition>> {
    let comp = sqlx::query_as::<_, Competition>(&format!(
        "SELECT {COMP_COLS} FROM competition WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(comp)
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<Competition>> {
    let comps = sqlx::query_as::<_, Competition>(&format!(
        "SELECT {COMP_COLS} FROM competition ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(comps)
}

/// Create a competition together with its initial roster.
///
/// One transaction: a competition is never observable without the
/// players/teams it was created with. Match/solo participants are seeded
/// with the competition's kicks-per-turn allowance.
pub async fn create(pool: &SqlitePool, data: CompetitionCreate) -> RepoResult<Competition> {
    if data.kicks_per_turn <= 0 {
        return Err(RepoError::Validation(format!(
            "kicks_per_turn must be positive, got {}",
            data.kicks_per_turn
        )));
    }
    if data.kind == CompetitionKind::Team && data.team_size.is_none() {
        return Err(RepoError::Validation(
            "Team competitions require team_size".into(),
        ));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let comp = sqlx::query_as::<_, Competition>(&format!(
        "INSERT INTO competition (name, kind, status, cost, kicks_per_turn, team_size, created_at, updated_at) VALUES (?1, ?2, 'DRAFT', ?3, ?4, ?5, ?6, ?6) RETURNING {COMP_COLS}"
    ))
    .bind(&data.name)
    .bind(data.kind)
    .bind(data.cost)
    .bind(data.kicks_per_turn)
    .bind(data.team_size)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    match data.kind {
        CompetitionKind::Individual => {
            for player_id in &data.player_ids {
                sqlx::query(
                    "INSERT INTO participant (competition_id, player_id, goals, kicks_taken, created_at, updated_at) VALUES (?1, ?2, 0, 0, ?3, ?3)",
                )
                .bind(comp.id)
                .bind(player_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }
        CompetitionKind::Team => {
            for team_id in &data.team_ids {
                sqlx::query(
                    "INSERT INTO team_entry (competition_id, team_id, created_at) VALUES (?1, ?2, ?3)",
                )
                .bind(comp.id)
                .bind(team_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }
        CompetitionKind::Match | CompetitionKind::Solo => {
            for player_id in &data.player_ids {
                sqlx::query(
                    "INSERT INTO turn_participant (competition_id, player_id, kicks_remaining, total_kicks_used, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 0, 1, ?4, ?4)",
                )
                .bind(comp.id)
                .bind(player_id)
                .bind(comp.kicks_per_turn)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    tx.commit().await?;
    Ok(comp)
}

pub async fn start(pool: &SqlitePool, id: i64) -> RepoResult<Competition> {
    transition(pool, id, &["DRAFT"], "ACTIVE").await
}

pub async fn end(pool: &SqlitePool, id: i64) -> RepoResult<Competition> {
    transition(pool, id, &["ACTIVE"], "ENDED").await
}

pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<Competition> {
    transition(pool, id, &["DRAFT", "ACTIVE"], "CANCELLED").await
}

/// One-directional status transition; rejects anything not in `from`.
async fn transition(
    pool: &SqlitePool,
    id: i64,
    from: &[&str],
    to: &str,
) -> RepoResult<Competition> {
    let now = shared::util::now_millis();
    let placeholders = from.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "UPDATE competition SET status = ?, updated_at = ? WHERE id = ? AND status IN ({placeholders})"
    );

    let mut query = sqlx::query(&sql).bind(to).bind(now).bind(id);
    for s in from {
        query = query.bind(*s);
    }
    let rows = query.execute(pool).await?.rows_affected();

    if rows == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Competition {id} not found"))),
            Some(c) => Err(RepoError::InvalidState(format!(
                "Competition {id} is {:?}, cannot move to {to}",
                c.status
            ))),
        };
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Competition {id} vanished after update")))
}
