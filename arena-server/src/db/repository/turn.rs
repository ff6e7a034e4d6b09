//! Match / Solo Turn Tracker
//!
//! Fixed per-player kick allowance, decremented per logged turn and
//! floored at zero; the participant flips inactive when exhausted.
//! Unlike `scoring::log_score`, this path requires the parent
//! competition to be ACTIVE.

use super::{RepoError, RepoResult, competition};
use shared::models::{
    CompetitionKind, CompetitionStatus, KickLog, MatchScore, TurnLog, TurnOutcome, TurnParticipant,
};
use sqlx::SqlitePool;

const TURN_COLS: &str = "id, competition_id, player_id, team_id, kicks_remaining, total_kicks_used, is_active, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TurnParticipant>> {
    let p = sqlx::query_as::<_, TurnParticipant>(&format!(
        "SELECT {TURN_COLS} FROM turn_participant WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(p)
}

/// Register a player into a match/solo competition, seeding the kick
/// allowance from the competition.
pub async fn add_participant(
    pool: &SqlitePool,
    competition_id: i64,
    player_id: i64,
    team_id: Option<i64>,
) -> RepoResult<TurnParticipant> {
    let comp = competition::find_by_id(pool, competition_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Competition {competition_id} not found")))?;
    if !matches!(comp.kind, CompetitionKind::Match | CompetitionKind::Solo) {
        return Err(RepoError::InvalidState(format!(
            "Competition {competition_id} is {:?}, not match/solo play",
            comp.kind
        )));
    }

    let now = shared::util::now_millis();
    let p = sqlx::query_as::<_, TurnParticipant>(&format!(
        "INSERT INTO turn_participant (competition_id, player_id, team_id, kicks_remaining, total_kicks_used, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, 1, ?5, ?5) RETURNING {TURN_COLS}"
    ))
    .bind(competition_id)
    .bind(player_id)
    .bind(team_id)
    .bind(comp.kicks_per_turn)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Player {player_id} already registered in competition {competition_id}"
        )),
        other => other,
    })?;
    Ok(p)
}

/// Log one turn against a match/solo participant.
///
/// Rejection order: competition not ACTIVE, participant inactive,
/// insufficient kicks. The decrement itself is a guarded single UPDATE;
/// a concurrent turn that drains the allowance first shows up as 0 rows
/// here, never as a negative balance.
pub async fn log_turn(pool: &SqlitePool, turn: TurnLog) -> RepoResult<TurnOutcome> {
    if turn.kicks_used <= 0 {
        return Err(RepoError::Validation(format!(
            "kicks_used must be positive, got {}",
            turn.kicks_used
        )));
    }

    let participant = find_by_id(pool, turn.participant_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!("Turn participant {} not found", turn.participant_id))
        })?;

    let comp = competition::find_by_id(pool, participant.competition_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!(
                "Competition {} not found",
                participant.competition_id
            ))
        })?;
    if comp.status != CompetitionStatus::Active {
        return Err(RepoError::InvalidState(format!(
            "Competition {} is {:?}, turns require ACTIVE",
            comp.id, comp.status
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, TurnParticipant>(&format!(
        "UPDATE turn_participant SET kicks_remaining = MAX(0, kicks_remaining - ?1), total_kicks_used = total_kicks_used + ?1, is_active = CASE WHEN kicks_remaining - ?1 > 0 THEN 1 ELSE 0 END, updated_at = ?2 WHERE id = ?3 AND is_active = 1 AND kicks_remaining >= ?1 RETURNING {TURN_COLS}"
    ))
    .bind(turn.kicks_used)
    .bind(now)
    .bind(turn.participant_id)
    .fetch_optional(&mut *tx)
    .await?;

    let updated = match updated {
        Some(p) => p,
        None => {
            // Guard failed: diagnose on the same connection — a second
            // pool acquire here would deadlock a contended pool
            let current = sqlx::query_as::<_, TurnParticipant>(&format!(
                "SELECT {TURN_COLS} FROM turn_participant WHERE id = ?"
            ))
            .bind(turn.participant_id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.rollback().await?;

            let current = current.ok_or_else(|| {
                RepoError::NotFound(format!(
                    "Turn participant {} not found",
                    turn.participant_id
                ))
            })?;
            return if !current.is_active {
                Err(RepoError::InvalidState(format!(
                    "Participant {} has exhausted their turn allowance",
                    turn.participant_id
                )))
            } else {
                Err(RepoError::Insufficient(format!(
                    "Player only has {} kicks remaining, cannot use {}",
                    current.kicks_remaining, turn.kicks_used
                )))
            };
        }
    };

    sqlx::query(
        "INSERT INTO kick_log (turn_participant_id, competition_id, kicks_used, goals, logged_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(updated.id)
    .bind(updated.competition_id)
    .bind(turn.kicks_used)
    .bind(turn.goals)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    // Match play: fold into the team's running score
    if comp.kind == CompetitionKind::Match {
        if let Some(team_id) = updated.team_id {
            sqlx::query(
                "INSERT INTO match_score (competition_id, team_id, goals, kicks, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT (competition_id, team_id) DO UPDATE SET goals = goals + ?3, kicks = kicks + ?4, updated_at = ?5",
            )
            .bind(updated.competition_id)
            .bind(team_id)
            .bind(turn.goals)
            .bind(turn.kicks_used)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(TurnOutcome {
        kicks_remaining: updated.kicks_remaining,
        became_inactive: !updated.is_active,
    })
}

/// Kick history for a participant, oldest first.
pub async fn kick_history(pool: &SqlitePool, participant_id: i64) -> RepoResult<Vec<KickLog>> {
    let logs = sqlx::query_as::<_, KickLog>(
        "SELECT id, turn_participant_id, competition_id, kicks_used, goals, logged_at FROM kick_log WHERE turn_participant_id = ? ORDER BY logged_at ASC, id ASC",
    )
    .bind(participant_id)
    .fetch_all(pool)
    .await?;
    Ok(logs)
}

/// Running match scores per team.
pub async fn match_scores(pool: &SqlitePool, competition_id: i64) -> RepoResult<Vec<MatchScore>> {
    let scores = sqlx::query_as::<_, MatchScore>(
        "SELECT id, competition_id, team_id, goals, kicks, updated_at FROM match_score WHERE competition_id = ? ORDER BY goals DESC, team_id ASC",
    )
    .bind(competition_id)
    .fetch_all(pool)
    .await?;
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use shared::models::CompetitionCreate;

    async fn seed_match(pool: &SqlitePool, kind: CompetitionKind, start: bool) -> i64 {
        let comp = competition::create(
            pool,
            CompetitionCreate {
                name: "Shootout".into(),
                kind,
                cost: 0,
                kicks_per_turn: 5,
                team_size: None,
                player_ids: vec![],
                team_ids: vec![],
            },
        )
        .await
        .unwrap();
        if start {
            competition::start(pool, comp.id).await.unwrap();
        }
        comp.id
    }

    fn turn(participant_id: i64, kicks: i64, goals: i64) -> TurnLog {
        TurnLog {
            participant_id,
            kicks_used: kicks,
            goals,
        }
    }

    #[tokio::test]
    async fn allowance_decrements_and_exhausts() {
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Solo, true).await;
        let p = add_participant(&pool, comp, 1, None).await.unwrap();
        assert_eq!(p.kicks_remaining, 5);

        let o = log_turn(&pool, turn(p.id, 3, 1)).await.unwrap();
        assert_eq!(o.kicks_remaining, 2);
        assert!(!o.became_inactive);

        let o = log_turn(&pool, turn(p.id, 2, 0)).await.unwrap();
        assert_eq!(o.kicks_remaining, 0);
        assert!(o.became_inactive);

        // Allowance gone: participant now inactive
        let err = log_turn(&pool, turn(p.id, 1, 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
    }

    #[tokio::test]
    async fn over_allowance_turn_is_rejected_not_floored() {
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Match, true).await;
        let p = add_participant(&pool, comp, 1, Some(10)).await.unwrap();

        log_turn(&pool, turn(p.id, 3, 1)).await.unwrap(); // 2 remain

        let err = log_turn(&pool, turn(p.id, 3, 1)).await.unwrap_err();
        match err {
            RepoError::Insufficient(msg) => assert!(msg.contains("2 kicks remaining")),
            other => panic!("expected Insufficient, got {other:?}"),
        }

        // Rejected turn left no trace
        let p = find_by_id(&pool, p.id).await.unwrap().unwrap();
        assert_eq!(p.kicks_remaining, 2);
        assert_eq!(p.total_kicks_used, 3);
        assert_eq!(kick_history(&pool, p.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_guard_diagnoses_without_second_connection() {
        // The test pool holds exactly one connection; if the diagnosis
        // read tried to acquire another one it would hang here instead
        // of returning the reason.
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Solo, true).await;
        let p = add_participant(&pool, comp, 1, None).await.unwrap();
        log_turn(&pool, turn(p.id, 3, 1)).await.unwrap(); // 2 remain

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            log_turn(&pool, turn(p.id, 3, 0)),
        )
        .await
        .expect("diagnosis must not wait on the pool");
        assert!(matches!(result.unwrap_err(), RepoError::Insufficient(_)));
    }

    #[tokio::test]
    async fn turn_rejected_unless_active() {
        // Pins the asymmetry with scoring::log_score, which accepts
        // any competition status.
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Solo, false).await;
        let p = add_participant(&pool, comp, 1, None).await.unwrap();

        let err = log_turn(&pool, turn(p.id, 1, 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));

        competition::start(&pool, comp).await.unwrap();
        log_turn(&pool, turn(p.id, 1, 0)).await.unwrap();
    }

    #[tokio::test]
    async fn match_play_folds_into_team_score() {
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Match, true).await;
        let p1 = add_participant(&pool, comp, 1, Some(100)).await.unwrap();
        let p2 = add_participant(&pool, comp, 2, Some(200)).await.unwrap();

        log_turn(&pool, turn(p1.id, 5, 3)).await.unwrap();
        log_turn(&pool, turn(p2.id, 5, 2)).await.unwrap();

        let scores = match_scores(&pool, comp).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!((scores[0].team_id, scores[0].goals), (100, 3));
        assert_eq!((scores[1].team_id, scores[1].goals), (200, 2));
    }

    #[tokio::test]
    async fn solo_play_keeps_no_team_score() {
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Solo, true).await;
        let p = add_participant(&pool, comp, 1, None).await.unwrap();
        log_turn(&pool, turn(p.id, 2, 1)).await.unwrap();

        assert!(match_scores(&pool, comp).await.unwrap().is_empty());
        assert_eq!(kick_history(&pool, p.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_non_positive_kicks() {
        let pool = test_pool().await;
        let comp = seed_match(&pool, CompetitionKind::Solo, true).await;
        let p = add_participant(&pool, comp, 1, None).await.unwrap();
        assert!(matches!(
            log_turn(&pool, turn(p.id, 0, 0)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn cannot_register_into_individual_competition() {
        let pool = test_pool().await;
        let comp = competition::create(
            &pool,
            CompetitionCreate {
                name: "Open".into(),
                kind: CompetitionKind::Individual,
                cost: 0,
                kicks_per_turn: 5,
                team_size: None,
                player_ids: vec![],
                team_ids: vec![],
            },
        )
        .await
        .unwrap();

        let err = add_participant(&pool, comp.id, 1, None).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
    }
}
