//! Leaderboard Repository
//!
//! The global mirror feed (written inside the scoring transaction) and
//! the computed per-competition standings.

use super::RepoResult;
use shared::models::{LeaderboardEntry, StandingsRow, TeamStats};
use sqlx::SqlitePool;

const ENTRY_COLS: &str =
    "id, player_id, staff_id, competition_id, goals, kicks_used, is_team_play, recorded_at";

/// Append a mirror entry. Executor-generic: the scoring engine runs this
/// inside its transaction so the mirror commits with the participant
/// update or not at all.
pub async fn append_entry<'e, E>(
    executor: E,
    player_id: i64,
    staff_id: i64,
    competition_id: i64,
    goals: i64,
    kicks_used: i64,
    is_team_play: bool,
    recorded_at: i64,
) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO leaderboard_entry (player_id, staff_id, competition_id, goals, kicks_used, is_team_play, recorded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(player_id)
    .bind(staff_id)
    .bind(competition_id)
    .bind(goals)
    .bind(kicks_used)
    .bind(is_team_play)
    .bind(recorded_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Venue-wide feed for a `[start, end)` window (venue-timezone day).
pub async fn global_feed(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<LeaderboardEntry>> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(&format!(
        "SELECT {ENTRY_COLS} FROM leaderboard_entry WHERE recorded_at >= ? AND recorded_at < ? ORDER BY goals DESC, recorded_at ASC"
    ))
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Individual standings: most goals first, fewer kicks breaking ties.
pub async fn standings(pool: &SqlitePool, competition_id: i64) -> RepoResult<Vec<StandingsRow>> {
    let rows = sqlx::query_as::<_, StandingsRow>(
        "SELECT player_id, team_id, goals, kicks_taken FROM participant WHERE competition_id = ? ORDER BY goals DESC, kicks_taken ASC, player_id ASC",
    )
    .bind(competition_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Team standings from the running aggregates.
pub async fn team_standings(
    pool: &SqlitePool,
    competition_id: i64,
) -> RepoResult<Vec<TeamStats>> {
    let rows = sqlx::query_as::<_, TeamStats>(
        "SELECT id, team_id, competition_id, total_goals, total_attempts, updated_at FROM team_stats WHERE competition_id = ? ORDER BY total_goals DESC, total_attempts ASC, team_id ASC",
    )
    .bind(competition_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    #[tokio::test]
    async fn global_feed_window_is_half_open() {
        let pool = test_pool().await;
        append_entry(&pool, 1, 9, 1, 3, 5, false, 1_000).await.unwrap();
        append_entry(&pool, 2, 9, 1, 2, 5, false, 2_000).await.unwrap();
        append_entry(&pool, 3, 9, 1, 1, 5, false, 3_000).await.unwrap();

        let feed = global_feed(&pool, 1_000, 3_000).await.unwrap();
        let players: Vec<i64> = feed.iter().map(|e| e.player_id).collect();
        // 3_000 excluded, ordered by goals desc
        assert_eq!(players, vec![1, 2]);
    }
}
