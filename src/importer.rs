//! Idempotent batch import into the announcement store.
//!
//! The store is a single `announcements` table keyed by URL. Uniqueness is
//! enforced by the database (`url TEXT NOT NULL UNIQUE`), not just by an
//! application-level check, so two overlapping imports of the same URL can
//! never produce two rows. Each spider batch commits in one transaction;
//! a failed batch rolls back whole and the next run's conflict handling
//! re-deduplicates from scratch.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::{info, instrument};

use crate::error::ImportError;
use crate::models::Announcement;

/// Create the announcement table and its unique URL constraint if absent.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), ImportError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS announcements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            publish_date TEXT NOT NULL,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a batch of announcements, skipping URLs already stored.
///
/// Returns the number of newly inserted rows. The whole batch commits in
/// one transaction; an empty batch returns 0 without touching the store.
#[instrument(level = "info", skip_all, fields(batch = records.len()))]
pub async fn import_batch(
    pool: &SqlitePool,
    records: &[Announcement],
) -> Result<u64, ImportError> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for record in records {
        let result = sqlx::query(
            r#"
            INSERT INTO announcements (title, url, publish_date, source, category)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(&record.title)
        .bind(&record.url)
        .bind(&record.publish_date)
        .bind(&record.source)
        .bind(&record.category)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    info!(inserted, skipped = records.len() as u64 - inserted, "batch imported");
    Ok(inserted)
}

/// Total number of stored announcements.
pub async fn count_announcements(pool: &SqlitePool) -> Result<i64, ImportError> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM announcements")
        .fetch_one(pool)
        .await?;
    Ok(row.get("n"))
}

/// Most recently published announcements, newest first.
pub async fn recent_announcements(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<Announcement>, ImportError> {
    let rows = sqlx::query(
        r#"
        SELECT title, url, publish_date, source, category
        FROM announcements
        ORDER BY publish_date DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Announcement {
            title: r.get("title"),
            url: r.get("url"),
            publish_date: r.get("publish_date"),
            source: r.get("source"),
            category: r.get("category"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn announcement(url: &str, date: &str) -> Announcement {
        Announcement {
            title: format!("公告 {url}"),
            url: url.to_string(),
            publish_date: date.to_string(),
            source: "测试来源".to_string(),
            category: "测试".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let pool = memory_pool().await;
        assert_eq!(import_batch(&pool, &[]).await.unwrap(), 0);
        assert_eq!(count_announcements(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_counts_new_rows() {
        let pool = memory_pool().await;
        let batch = vec![announcement("a", "2026-08-25"), announcement("b", "2026-08-24")];

        assert_eq!(import_batch(&pool, &batch).await.unwrap(), 2);
        assert_eq!(count_announcements(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let pool = memory_pool().await;
        let batch = vec![announcement("a", "2026-08-25"), announcement("b", "2026-08-24")];

        assert_eq!(import_batch(&pool, &batch).await.unwrap(), 2);
        assert_eq!(import_batch(&pool, &batch).await.unwrap(), 0);
        assert_eq!(count_announcements(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_url_within_one_batch_stores_one_row() {
        let pool = memory_pool().await;
        let batch = vec![announcement("a", "2026-08-25"), announcement("a", "2026-08-25")];

        assert_eq!(import_batch(&pool, &batch).await.unwrap(), 1);
        assert_eq!(count_announcements(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_existing_row_is_never_overwritten() {
        let pool = memory_pool().await;
        import_batch(&pool, &[announcement("a", "2026-08-25")])
            .await
            .unwrap();

        // Same URL, different title: the stored row must win.
        let mut updated = announcement("a", "2026-08-25");
        updated.title = "改过的标题".to_string();
        import_batch(&pool, &[updated]).await.unwrap();

        let rows = recent_announcements(&pool, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "公告 a");
    }

    #[tokio::test]
    async fn test_recent_announcements_orders_newest_first() {
        let pool = memory_pool().await;
        let batch = vec![
            announcement("old", "2026-08-01"),
            announcement("new", "2026-08-25"),
            announcement("mid", "2026-08-10"),
        ];
        import_batch(&pool, &batch).await.unwrap();

        let rows = recent_announcements(&pool, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "new");
        assert_eq!(rows[1].url, "mid");
    }
}
