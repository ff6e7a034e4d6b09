//! Activity Log Repository
//!
//! Append-only audit rows per scoring event. Diagnostic, not
//! authoritative: the scoring paths call [`append_best_effort`] after
//! their transaction commits, and a failed append is logged and dropped.

use super::RepoResult;
use shared::models::{ActivityEntry, ActivityRecord};
use sqlx::SqlitePool;

const ACTIVITY_COLS: &str = "id, competition_id, staff_id, player_id, team_id, goals, kicks_used, consecutive_run, notes, logged_at";

pub async fn append(pool: &SqlitePool, record: ActivityRecord) -> RepoResult<ActivityEntry> {
    let now = shared::util::now_millis();
    let entry = sqlx::query_as::<_, ActivityEntry>(&format!(
        "INSERT INTO activity_log (competition_id, staff_id, player_id, team_id, goals, kicks_used, consecutive_run, notes, logged_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING {ACTIVITY_COLS}"
    ))
    .bind(record.competition_id)
    .bind(record.staff_id)
    .bind(record.player_id)
    .bind(record.team_id)
    .bind(record.goals)
    .bind(record.kicks_used)
    .bind(record.consecutive_run)
    .bind(record.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(entry)
}

/// Append that never fails the caller. Used post-commit by the scoring
/// paths: the authoritative update already happened.
pub async fn append_best_effort(pool: &SqlitePool, record: ActivityRecord) {
    let competition_id = record.competition_id;
    if let Err(e) = append(pool, record).await {
        tracing::warn!(
            target: "activity",
            competition_id,
            error = %e,
            "Failed to append activity entry, scoring result unaffected"
        );
    }
}

/// Newest-first activity feed for a competition.
pub async fn find_by_competition(
    pool: &SqlitePool,
    competition_id: i64,
    limit: i32,
) -> RepoResult<Vec<ActivityEntry>> {
    let entries = sqlx::query_as::<_, ActivityEntry>(&format!(
        "SELECT {ACTIVITY_COLS} FROM activity_log WHERE competition_id = ? ORDER BY logged_at DESC, id DESC LIMIT ?"
    ))
    .bind(competition_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    fn record(goals: i64) -> ActivityRecord {
        ActivityRecord {
            competition_id: 1,
            staff_id: 50,
            player_id: Some(7),
            team_id: None,
            goals,
            kicks_used: 5,
            consecutive_run: None,
            notes: Some("warmup round".into()),
        }
    }

    #[tokio::test]
    async fn appends_and_lists_newest_first() {
        let pool = test_pool().await;
        append(&pool, record(1)).await.unwrap();
        append(&pool, record(2)).await.unwrap();
        append(&pool, record(3)).await.unwrap();

        let entries = find_by_competition(&pool, 1, 10).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].goals, 3);
        assert_eq!(entries[2].goals, 1);
    }

    #[tokio::test]
    async fn best_effort_append_swallows_failure() {
        let pool = test_pool().await;
        // Sabotage the table; the call must not panic or error
        sqlx::query("DROP TABLE activity_log")
            .execute(&pool)
            .await
            .unwrap();
        append_best_effort(&pool, record(1)).await;
    }
}
