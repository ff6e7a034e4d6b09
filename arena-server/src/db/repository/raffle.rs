//! Daily Raffle Repository
//!
//! One uniform random pick among the day's PLAYED tickets. The window
//! is `[start, end)` in venue-timezone millis — conversion happens in
//! the handler layer, this module only sees `i64` bounds.

use super::{RepoError, RepoResult};
use rand::Rng;
use shared::models::RaffleDraw;
use sqlx::SqlitePool;

const DRAW_COLS: &str = "id, draw_date, draw_number, ticket_id, ticket_number, player_id, drawn_at";

/// Draw one winner for `draw_date` among PLAYED tickets issued inside
/// the `[start_millis, end_millis)` window.
///
/// `exclude_previous_winners` drops tickets that already won an earlier
/// draw on the same date. Draw numbers are 1-based and allocated inside
/// the insert transaction; `(draw_date, draw_number)` is UNIQUE, so two
/// racing draws cannot share a number.
pub async fn draw(
    pool: &SqlitePool,
    draw_date: &str,
    start_millis: i64,
    end_millis: i64,
    exclude_previous_winners: bool,
) -> RepoResult<RaffleDraw> {
    let eligible: Vec<(i64, i64, i64)> = if exclude_previous_winners {
        sqlx::query_as(
            "SELECT id, number, player_id FROM ticket WHERE status = 'PLAYED' AND issued_at >= ?1 AND issued_at < ?2 AND id NOT IN (SELECT ticket_id FROM raffle_draw WHERE draw_date = ?3) ORDER BY number ASC",
        )
        .bind(start_millis)
        .bind(end_millis)
        .bind(draw_date)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as(
            "SELECT id, number, player_id FROM ticket WHERE status = 'PLAYED' AND issued_at >= ?1 AND issued_at < ?2 ORDER BY number ASC",
        )
        .bind(start_millis)
        .bind(end_millis)
        .fetch_all(pool)
        .await?
    };

    if eligible.is_empty() {
        return Err(RepoError::Insufficient(format!(
            "No eligible tickets for raffle on {draw_date}"
        )));
    }

    let (ticket_id, ticket_number, player_id) =
        eligible[rand::thread_rng().gen_range(0..eligible.len())];

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let draw_number: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(draw_number), 0) + 1 FROM raffle_draw WHERE draw_date = ?",
    )
    .bind(draw_date)
    .fetch_one(&mut *tx)
    .await?;

    let record = sqlx::query_as::<_, RaffleDraw>(&format!(
        "INSERT INTO raffle_draw (draw_date, draw_number, ticket_id, ticket_number, player_id, drawn_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {DRAW_COLS}"
    ))
    .bind(draw_date)
    .bind(draw_number)
    .bind(ticket_id)
    .bind(ticket_number)
    .bind(player_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Draw #{draw_number} for {draw_date} already recorded, retry"
        )),
        other => other,
    })?;

    tx.commit().await?;

    tracing::info!(
        target: "raffle",
        date = draw_date,
        draw = draw_number,
        ticket = ticket_number,
        player = player_id,
        "raffle winner drawn"
    );
    Ok(record)
}

/// All draws for a date, in draw order.
pub async fn list_draws(pool: &SqlitePool, draw_date: &str) -> RepoResult<Vec<RaffleDraw>> {
    let draws = sqlx::query_as::<_, RaffleDraw>(&format!(
        "SELECT {DRAW_COLS} FROM raffle_draw WHERE draw_date = ? ORDER BY draw_number ASC"
    ))
    .bind(draw_date)
    .fetch_all(pool)
    .await?;
    Ok(draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ticket;
    use crate::db::test_support::test_pool;

    const DATE: &str = "2025-06-15";

    /// Issue + mark played, pinning issued_at so window tests are exact.
    async fn played_ticket(pool: &SqlitePool, player_id: i64, issued_at: i64) -> i64 {
        let t = ticket::issue(pool, player_id).await.unwrap();
        ticket::mark_played(pool, t.id).await.unwrap();
        sqlx::query("UPDATE ticket SET issued_at = ? WHERE id = ?")
            .bind(issued_at)
            .bind(t.id)
            .execute(pool)
            .await
            .unwrap();
        t.id
    }

    #[tokio::test]
    async fn empty_pool_is_insufficient() {
        let pool = test_pool().await;
        // An unplayed ticket does not qualify
        ticket::issue(&pool, 1).await.unwrap();

        let err = draw(&pool, DATE, 0, i64::MAX, false).await.unwrap_err();
        match err {
            RepoError::Insufficient(msg) => assert!(msg.contains(DATE)),
            other => panic!("expected Insufficient, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_played_ticket_always_wins() {
        let pool = test_pool().await;
        let id = played_ticket(&pool, 42, 5_000).await;

        let d = draw(&pool, DATE, 0, 10_000, false).await.unwrap();
        assert_eq!(d.ticket_id, id);
        assert_eq!(d.player_id, 42);
        assert_eq!(d.draw_number, 1);
        assert_eq!(d.draw_date, DATE);
    }

    #[tokio::test]
    async fn draws_number_sequentially_within_a_day() {
        let pool = test_pool().await;
        played_ticket(&pool, 1, 5_000).await;

        let d1 = draw(&pool, DATE, 0, 10_000, false).await.unwrap();
        let d2 = draw(&pool, DATE, 0, 10_000, false).await.unwrap();
        assert_eq!((d1.draw_number, d2.draw_number), (1, 2));

        // A different date restarts the numbering
        let d3 = draw(&pool, "2025-06-16", 0, 10_000, false).await.unwrap();
        assert_eq!(d3.draw_number, 1);

        assert_eq!(list_draws(&pool, DATE).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn window_is_half_open_on_issued_at() {
        let pool = test_pool().await;
        played_ticket(&pool, 1, 999).await; // before start
        let inside = played_ticket(&pool, 2, 1_000).await; // at start, included
        played_ticket(&pool, 3, 2_000).await; // at end, excluded

        let d = draw(&pool, DATE, 1_000, 2_000, false).await.unwrap();
        assert_eq!(d.ticket_id, inside);
    }

    #[tokio::test]
    async fn exclude_previous_winners_drains_the_pool() {
        let pool = test_pool().await;
        played_ticket(&pool, 1, 5_000).await;

        draw(&pool, DATE, 0, 10_000, true).await.unwrap();
        // The only ticket already won today
        let err = draw(&pool, DATE, 0, 10_000, true).await.unwrap_err();
        assert!(matches!(err, RepoError::Insufficient(_)));

        // Without the exclusion the same ticket may win again
        let d = draw(&pool, DATE, 0, 10_000, false).await.unwrap();
        assert_eq!(d.draw_number, 2);
    }
}
