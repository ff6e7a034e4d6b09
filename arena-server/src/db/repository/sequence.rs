//! Ticket Sequence Counter
//!
//! Single persisted counter row, incremented and read in one statement.
//! Never derived from `MAX(number) + 1` over the ticket table — that
//! read-then-write races under concurrent issuance.

use super::{RepoError, RepoResult};

/// Atomically increment the counter and return the new value.
///
/// Generic over the executor so ticket issuance can run it inside its
/// own transaction. SQLite serializes writers, so two concurrent calls
/// can never observe the same value.
pub async fn next_ticket_number<'e, E>(executor: E) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let value: i64 = sqlx::query_scalar(
        "UPDATE ticket_counter SET value = value + 1 WHERE id = 1 RETURNING value",
    )
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::Database("Ticket counter row missing".into()))?;
    Ok(value)
}

/// Current counter value without incrementing (diagnostics only)
pub async fn current_value(pool: &sqlx::SqlitePool) -> RepoResult<i64> {
    let value: i64 = sqlx::query_scalar("SELECT value FROM ticket_counter WHERE id = 1")
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Ticket counter row missing".into()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{test_pool, test_pool_on_disk};

    #[tokio::test]
    async fn increments_from_zero() {
        let pool = test_pool().await;
        assert_eq!(next_ticket_number(&pool).await.unwrap(), 1);
        assert_eq!(next_ticket_number(&pool).await.unwrap(), 2);
        assert_eq!(current_value(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_never_collide() {
        let (pool, _dir) = test_pool_on_disk().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let mut numbers = Vec::new();
                for _ in 0..25 {
                    numbers.push(next_ticket_number(&pool).await.unwrap());
                }
                numbers
            }));
        }

        let mut all = Vec::new();
        for h in handles {
            all.extend(h.await.unwrap());
        }

        // 200 distinct values, exactly 1..=200: no duplicates, no gaps
        all.sort_unstable();
        assert_eq!(all.len(), 200);
        assert_eq!(all, (1..=200).collect::<Vec<i64>>());
    }
}
