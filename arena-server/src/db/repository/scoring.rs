//! Scoring Transaction Engine
//!
//! The correctness-critical write path. One transaction covers the
//! participant (or team) update and the global leaderboard mirror; the
//! activity-log append happens after commit and is best-effort.
//!
//! Increments are expressed in SQL (`goals = goals + ?`), so concurrent
//! calls against the same row serialize through SQLite's write lock and
//! never lose an update.

use super::{RepoError, RepoResult, activity, competition, leaderboard, registry};
use shared::models::{
    ActivityRecord, CompetitionKind, Participant, ScoreLog, ScoreOutcome,
};
use sqlx::SqlitePool;

const PARTICIPANT_COLS: &str =
    "id, competition_id, player_id, team_id, goals, kicks_taken, created_at, updated_at";

/// Log a scoring event against an individual or team competition.
///
/// Deliberately does NOT require the competition to be ACTIVE — custom
/// competitions are scored live while still in draft. The match/solo
/// path (`turn::log_turn`) does require ACTIVE; the asymmetry is pinned
/// by tests in both modules.
pub async fn log_score(pool: &SqlitePool, staff_id: i64, event: ScoreLog) -> RepoResult<ScoreOutcome> {
    let comp = competition::find_by_id(pool, event.competition_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!("Competition {} not found", event.competition_id))
        })?;

    let outcome = match comp.kind {
        CompetitionKind::Individual => log_individual(pool, staff_id, &event).await?,
        CompetitionKind::Team => log_team(pool, staff_id, &event).await?,
        CompetitionKind::Match | CompetitionKind::Solo => {
            return Err(RepoError::InvalidState(format!(
                "Competition {} is {:?} play, use the turn tracker",
                comp.id, comp.kind
            )));
        }
    };

    // Post-commit, best-effort: never rolls back the score
    activity::append_best_effort(
        pool,
        ActivityRecord {
            competition_id: event.competition_id,
            staff_id,
            player_id: Some(event.player_id),
            team_id: outcome.participant.team_id,
            goals: event.goals,
            kicks_used: event.kicks_used,
            consecutive_run: event.consecutive_run,
            notes: event.notes.clone(),
        },
    )
    .await;

    Ok(outcome)
}

/// Individual path: pure accumulation on an existing participant row.
async fn log_individual(
    pool: &SqlitePool,
    staff_id: i64,
    event: &ScoreLog,
) -> RepoResult<ScoreOutcome> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let participant = sqlx::query_as::<_, Participant>(&format!(
        "UPDATE participant SET goals = goals + ?1, kicks_taken = kicks_taken + ?2, updated_at = ?3 WHERE competition_id = ?4 AND player_id = ?5 RETURNING {PARTICIPANT_COLS}"
    ))
    .bind(event.goals)
    .bind(event.kicks_used)
    .bind(now)
    .bind(event.competition_id)
    .bind(event.player_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        RepoError::NotFound(format!(
            "Player {} is not a participant of competition {}",
            event.player_id, event.competition_id
        ))
    })?;

    let leaderboard_recorded = event.goals > 0;
    if leaderboard_recorded {
        leaderboard::append_entry(
            &mut *tx,
            event.player_id,
            staff_id,
            event.competition_id,
            event.goals,
            event.kicks_used,
            false,
            now,
        )
        .await?;
    }

    tx.commit().await?;
    Ok(ScoreOutcome {
        participant,
        leaderboard_recorded,
    })
}

/// Team path: upsert the player's scoped record and fold the deltas
/// into the team aggregate, same transaction.
async fn log_team(pool: &SqlitePool, staff_id: i64, event: &ScoreLog) -> RepoResult<ScoreOutcome> {
    let team_id = match event.team_id {
        Some(id) => id,
        None => {
            registry::resolve_team_for_player(pool, event.competition_id, event.player_id).await?
        }
    };

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let participant = sqlx::query_as::<_, Participant>(&format!(
        "INSERT INTO participant (competition_id, player_id, team_id, goals, kicks_taken, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) ON CONFLICT (competition_id, player_id) DO UPDATE SET goals = goals + ?4, kicks_taken = kicks_taken + ?5, team_id = ?3, updated_at = ?6 RETURNING {PARTICIPANT_COLS}"
    ))
    .bind(event.competition_id)
    .bind(event.player_id)
    .bind(team_id)
    .bind(event.goals)
    .bind(event.kicks_used)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO team_stats (team_id, competition_id, total_goals, total_attempts, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT (team_id, competition_id) DO UPDATE SET total_goals = total_goals + ?3, total_attempts = total_attempts + ?4, updated_at = ?5",
    )
    .bind(team_id)
    .bind(event.competition_id)
    .bind(event.goals)
    .bind(event.kicks_used)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let leaderboard_recorded = event.goals > 0;
    if leaderboard_recorded {
        leaderboard::append_entry(
            &mut *tx,
            event.player_id,
            staff_id,
            event.competition_id,
            event.goals,
            event.kicks_used,
            true,
            now,
        )
        .await?;
    }

    tx.commit().await?;
    Ok(ScoreOutcome {
        participant,
        leaderboard_recorded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{test_pool, test_pool_on_disk};
    use shared::models::CompetitionCreate;

    async fn seed_competition(
        pool: &SqlitePool,
        kind: CompetitionKind,
        players: Vec<i64>,
        teams: Vec<i64>,
    ) -> i64 {
        competition::create(
            pool,
            CompetitionCreate {
                name: "Test".into(),
                kind,
                cost: 1,
                kicks_per_turn: 5,
                team_size: if kind == CompetitionKind::Team {
                    Some(3)
                } else {
                    None
                },
                player_ids: players,
                team_ids: teams,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn score(competition_id: i64, player_id: i64, kicks: i64, goals: i64) -> ScoreLog {
        ScoreLog {
            competition_id,
            player_id,
            team_id: None,
            kicks_used: kicks,
            goals,
            consecutive_run: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn individual_score_updates_all_three_surfaces() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;

        let outcome = log_score(&pool, 99, score(comp, 1, 5, 2)).await.unwrap();
        assert_eq!(outcome.participant.goals, 2);
        assert_eq!(outcome.participant.kicks_taken, 5);
        assert!(outcome.leaderboard_recorded);

        // One mirror entry tagged to this competition
        let entries = leaderboard::global_feed(&pool, 0, i64::MAX).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].competition_id, comp);
        assert_eq!(entries[0].player_id, 1);
        assert_eq!(entries[0].staff_id, 99);
        assert!(!entries[0].is_team_play);

        // One activity entry
        let log = activity::find_by_competition(&pool, comp, 10).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].goals, 2);
        assert_eq!(log[0].kicks_used, 5);
    }

    #[tokio::test]
    async fn repeated_identical_calls_accumulate_exactly() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;

        for _ in 0..4 {
            log_score(&pool, 99, score(comp, 1, 5, 2)).await.unwrap();
        }

        let p = registry::find_participant(&pool, comp, 1).await.unwrap().unwrap();
        assert_eq!(p.goals, 8);
        assert_eq!(p.kicks_taken, 20);
    }

    #[tokio::test]
    async fn concurrent_scores_on_one_participant_never_lose_updates() {
        // Multi-connection, file-backed pool: the transactions genuinely
        // contend for SQLite's write lock instead of queueing on a
        // single connection.
        let (pool, _dir) = test_pool_on_disk().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..5 {
                    log_score(&pool, 99, score(comp, 1, 5, 2)).await.unwrap();
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let p = registry::find_participant(&pool, comp, 1).await.unwrap().unwrap();
        assert_eq!(p.goals, 80);
        assert_eq!(p.kicks_taken, 200);

        // Every committed score left its mirror entry
        let feed = leaderboard::global_feed(&pool, 0, i64::MAX).await.unwrap();
        assert_eq!(feed.len(), 40);
    }

    #[tokio::test]
    async fn zero_goals_skips_leaderboard_but_logs_activity() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;

        let outcome = log_score(&pool, 99, score(comp, 1, 5, 0)).await.unwrap();
        assert!(!outcome.leaderboard_recorded);

        assert!(leaderboard::global_feed(&pool, 0, i64::MAX).await.unwrap().is_empty());
        assert_eq!(
            activity::find_by_competition(&pool, comp, 10).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn unknown_participant_aborts_without_partial_writes() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;

        let err = log_score(&pool, 99, score(comp, 42, 5, 2)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        // No leaderboard mirror, no activity row
        assert!(leaderboard::global_feed(&pool, 0, i64::MAX).await.unwrap().is_empty());
        assert!(activity::find_by_competition(&pool, comp, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_competition_is_not_found() {
        let pool = test_pool().await;
        let err = log_score(&pool, 99, score(999, 1, 5, 2)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn match_competition_rejected_by_scoring_path() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Match, vec![1, 2], vec![]).await;

        let err = log_score(&pool, 99, score(comp, 1, 3, 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
    }

    #[tokio::test]
    async fn score_accepted_while_competition_draft() {
        // Pins the intentional asymmetry: log_score has no ACTIVE
        // requirement, unlike log_turn.
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;
        // Competition still DRAFT
        let outcome = log_score(&pool, 99, score(comp, 1, 5, 1)).await.unwrap();
        assert_eq!(outcome.participant.goals, 1);
    }

    #[tokio::test]
    async fn team_score_resolves_team_and_upserts() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Team, vec![], vec![100]).await;
        registry::add_team_member(&pool, 100, 7).await.unwrap();

        // First event inserts the scoped participant row
        let o1 = log_score(&pool, 99, score(comp, 7, 5, 2)).await.unwrap();
        assert_eq!(o1.participant.team_id, Some(100));
        assert_eq!(o1.participant.goals, 2);

        // Second event increments it
        let o2 = log_score(&pool, 99, score(comp, 7, 4, 1)).await.unwrap();
        assert_eq!(o2.participant.goals, 3);
        assert_eq!(o2.participant.kicks_taken, 9);

        // Aggregate tracks both events
        let stats = leaderboard::team_standings(&pool, comp).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_goals, 3);
        assert_eq!(stats[0].total_attempts, 9);

        // Mirror entries flagged as team play
        let feed = leaderboard::global_feed(&pool, 0, i64::MAX).await.unwrap();
        assert!(feed.iter().all(|e| e.is_team_play));
    }

    #[tokio::test]
    async fn team_score_with_unresolvable_player_aborts() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Team, vec![], vec![100]).await;
        // Player 9 has no team membership
        let err = log_score(&pool, 99, score(comp, 9, 5, 2)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        assert!(leaderboard::team_standings(&pool, comp).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn explicit_team_overrides_resolution() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Team, vec![], vec![100, 200]).await;
        registry::add_team_member(&pool, 100, 7).await.unwrap();

        let mut event = score(comp, 7, 5, 1);
        event.team_id = Some(200);
        let outcome = log_score(&pool, 99, event).await.unwrap();
        assert_eq!(outcome.participant.team_id, Some(200));
    }

    #[tokio::test]
    async fn team_stats_match_participant_sums() {
        // The aggregate and the per-player rows are separate statements
        // in one transaction; this asserts they stay equal when all
        // writes flow through log_score.
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Team, vec![], vec![100]).await;
        registry::add_team_member(&pool, 100, 7).await.unwrap();
        registry::add_team_member(&pool, 100, 8).await.unwrap();

        log_score(&pool, 99, score(comp, 7, 5, 2)).await.unwrap();
        log_score(&pool, 99, score(comp, 8, 5, 3)).await.unwrap();
        log_score(&pool, 99, score(comp, 7, 2, 0)).await.unwrap();

        let (sum_goals, sum_kicks): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(goals), 0), COALESCE(SUM(kicks_taken), 0) FROM participant WHERE competition_id = ? AND team_id = 100",
        )
        .bind(comp)
        .fetch_one(&pool)
        .await
        .unwrap();

        let stats = leaderboard::team_standings(&pool, comp).await.unwrap();
        assert_eq!(stats[0].total_goals, sum_goals);
        assert_eq!(stats[0].total_attempts, sum_kicks);
    }

    #[tokio::test]
    async fn goals_may_exceed_kicks_used() {
        // Documented policy: the engine records what staff report.
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;
        let outcome = log_score(&pool, 99, score(comp, 1, 2, 5)).await.unwrap();
        assert_eq!(outcome.participant.goals, 5);
        assert_eq!(outcome.participant.kicks_taken, 2);
    }

    #[tokio::test]
    async fn counters_never_decrease() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Individual, vec![1], vec![]).await;
        log_score(&pool, 99, score(comp, 1, 5, 2)).await.unwrap();
        // Zero-delta call leaves counters untouched
        let outcome = log_score(&pool, 99, score(comp, 1, 0, 0)).await.unwrap();
        assert_eq!(outcome.participant.goals, 2);
        assert_eq!(outcome.participant.kicks_taken, 5);
    }
}
