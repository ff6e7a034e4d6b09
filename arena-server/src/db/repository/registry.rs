//! Participant / Team Registry Repository
//!
//! Individual participants, team registrations, team membership, and the
//! active-roster subset for oversized teams.

use super::{RepoError, RepoResult};
use shared::models::{ActiveRosterEntry, Participant, TeamEntry};
use sqlx::SqlitePool;

const PARTICIPANT_COLS: &str =
    "id, competition_id, player_id, team_id, goals, kicks_taken, created_at, updated_at";

/// Insert a participant with zeroed counters.
///
/// At most one row per (competition, player) — a second insert for the
/// same pair fails with `Duplicate`.
pub async fn add_individual_participant(
    pool: &SqlitePool,
    competition_id: i64,
    player_id: i64,
) -> RepoResult<Participant> {
    let now = shared::util::now_millis();
    let participant = sqlx::query_as::<_, Participant>(&format!(
        "INSERT INTO participant (competition_id, player_id, goals, kicks_taken, created_at, updated_at) VALUES (?1, ?2, 0, 0, ?3, ?3) RETURNING {PARTICIPANT_COLS}"
    ))
    .bind(competition_id)
    .bind(player_id)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Player {player_id} already registered in competition {competition_id}"
        )),
        other => other,
    })?;
    Ok(participant)
}

pub async fn find_participant(
    pool: &SqlitePool,
    competition_id: i64,
    player_id: i64,
) -> RepoResult<Option<Participant>> {
    let participant = sqlx::query_as::<_, Participant>(&format!(
        "SELECT {PARTICIPANT_COLS} FROM participant WHERE competition_id = ? AND player_id = ?"
    ))
    .bind(competition_id)
    .bind(player_id)
    .fetch_optional(pool)
    .await?;
    Ok(participant)
}

/// Register a team for a team competition.
pub async fn add_team(pool: &SqlitePool, competition_id: i64, team_id: i64) -> RepoResult<TeamEntry> {
    let now = shared::util::now_millis();
    let entry = sqlx::query_as::<_, TeamEntry>(
        "INSERT INTO team_entry (competition_id, team_id, created_at) VALUES (?1, ?2, ?3) RETURNING id, competition_id, team_id, created_at",
    )
    .bind(competition_id)
    .bind(team_id)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Team {team_id} already registered in competition {competition_id}"
        )),
        other => other,
    })?;
    Ok(entry)
}

/// Add a player to a team's membership roster (registry-owned).
pub async fn add_team_member(pool: &SqlitePool, team_id: i64, player_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    // INSERT OR IGNORE: membership is idempotent
    sqlx::query(
        "INSERT OR IGNORE INTO team_member (team_id, player_id, created_at) VALUES (?1, ?2, ?3)",
    )
    .bind(team_id)
    .bind(player_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Which team does this player kick for in this competition?
pub async fn resolve_team_for_player(
    pool: &SqlitePool,
    competition_id: i64,
    player_id: i64,
) -> RepoResult<i64> {
    let team_id: Option<i64> = sqlx::query_scalar(
        "SELECT te.team_id FROM team_entry te JOIN team_member tm ON tm.team_id = te.team_id WHERE te.competition_id = ? AND tm.player_id = ? LIMIT 1",
    )
    .bind(competition_id)
    .bind(player_id)
    .fetch_optional(pool)
    .await?;

    team_id.ok_or_else(|| {
        RepoError::NotFound(format!(
            "Player {player_id} is not on any team in competition {competition_id}"
        ))
    })
}

/// Full-replace active roster for (competition, team).
///
/// Every team member not in `player_ids` ends up INACTIVE; re-running
/// with a different list deterministically leaves only the new list
/// active. Not a merge.
pub async fn set_active_roster(
    pool: &SqlitePool,
    competition_id: i64,
    team_id: i64,
    player_ids: &[i64],
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE active_roster SET status = 'INACTIVE', updated_at = ?1 WHERE competition_id = ?2 AND team_id = ?3",
    )
    .bind(now)
    .bind(competition_id)
    .bind(team_id)
    .execute(&mut *tx)
    .await?;

    for player_id in player_ids {
        sqlx::query(
            "INSERT INTO active_roster (competition_id, team_id, player_id, status, updated_at) VALUES (?1, ?2, ?3, 'ACTIVE', ?4) ON CONFLICT (competition_id, team_id, player_id) DO UPDATE SET status = 'ACTIVE', updated_at = ?4",
        )
        .bind(competition_id)
        .bind(team_id)
        .bind(player_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn list_roster(
    pool: &SqlitePool,
    competition_id: i64,
    team_id: i64,
) -> RepoResult<Vec<ActiveRosterEntry>> {
    let roster = sqlx::query_as::<_, ActiveRosterEntry>(
        "SELECT id, competition_id, team_id, player_id, status, updated_at FROM active_roster WHERE competition_id = ? AND team_id = ? ORDER BY player_id ASC",
    )
    .bind(competition_id)
    .bind(team_id)
    .fetch_all(pool)
    .await?;
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::competition;
    use crate::db::test_support::test_pool;
    use shared::models::{CompetitionCreate, CompetitionKind, RosterStatus};

    /// Participants and team entries reference real competition rows
    /// (foreign keys are enforced).
    async fn seed_competition(pool: &SqlitePool, kind: CompetitionKind) -> i64 {
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
                player_ids: vec![],
                team_ids: vec![],
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn duplicate_participant_is_rejected() {
        let pool = test_pool().await;
        let c1 = seed_competition(&pool, CompetitionKind::Individual).await;
        let c2 = seed_competition(&pool, CompetitionKind::Individual).await;

        let p = add_individual_participant(&pool, c1, 42).await.unwrap();
        assert_eq!(p.goals, 0);
        assert_eq!(p.kicks_taken, 0);

        let err = add_individual_participant(&pool, c1, 42).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // Same player in another competition is fine
        add_individual_participant(&pool, c2, 42).await.unwrap();
    }

    #[tokio::test]
    async fn resolve_team_via_membership() {
        let pool = test_pool().await;
        let comp = seed_competition(&pool, CompetitionKind::Team).await;
        add_team(&pool, comp, 100).await.unwrap();
        add_team_member(&pool, 100, 7).await.unwrap();
        add_team_member(&pool, 100, 8).await.unwrap();

        assert_eq!(resolve_team_for_player(&pool, comp, 7).await.unwrap(), 100);

        // Player 9 is on no team in this competition
        let err = resolve_team_for_player(&pool, comp, 9).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        // Membership alone is not enough — the team must be entered
        // in the competition
        add_team_member(&pool, 200, 9).await.unwrap();
        assert!(resolve_team_for_player(&pool, comp, 9).await.is_err());
    }

    #[tokio::test]
    async fn set_active_roster_is_full_replace() {
        let pool = test_pool().await;
        set_active_roster(&pool, 1, 100, &[1, 2]).await.unwrap();

        let active = |roster: &[ActiveRosterEntry]| {
            roster
                .iter()
                .filter(|r| r.status == RosterStatus::Active)
                .map(|r| r.player_id)
                .collect::<Vec<_>>()
        };

        let roster = list_roster(&pool, 1, 100).await.unwrap();
        assert_eq!(active(&roster), vec![1, 2]);

        // Replace with [3]: exactly 3 active, 1 and 2 inactive
        set_active_roster(&pool, 1, 100, &[3]).await.unwrap();
        let roster = list_roster(&pool, 1, 100).await.unwrap();
        assert_eq!(active(&roster), vec![3]);
        assert_eq!(
            roster
                .iter()
                .filter(|r| r.status == RosterStatus::Inactive)
                .map(|r| r.player_id)
                .collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[tokio::test]
    async fn active_roster_is_scoped_per_competition() {
        let pool = test_pool().await;
        set_active_roster(&pool, 1, 100, &[1]).await.unwrap();
        set_active_roster(&pool, 2, 100, &[2]).await.unwrap();

        let r1 = list_roster(&pool, 1, 100).await.unwrap();
        assert_eq!(r1.len(), 1);
        assert_eq!(r1[0].player_id, 1);
        assert_eq!(r1[0].status, RosterStatus::Active);
    }
}
