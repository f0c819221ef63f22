use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gala_core::cursor::ScanPosition;
use gala_core::models::{MediaRecord, MediaStatus};
use gala_core::AppError;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::traits::{CompletionOutcome, MediaScanPage, MediaStore};

/// Postgres media store.
///
/// Scans use keyset pagination on the composite key `(uploaded_at DESC,
/// id DESC)`, backed by the partial index on completed rows, so pages are
/// gap-free and duplicate-free under no concurrent writes.
#[derive(Clone)]
pub struct PgMediaStore {
    pool: PgPool,
}

impl PgMediaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<MediaRecord, AppError> {
    let status_raw: String = row.get("status");
    let status = MediaStatus::parse(&status_raw).ok_or_else(|| {
        AppError::Internal(format!("Unknown media status in store: {}", status_raw))
    })?;

    Ok(MediaRecord {
        id: row.get("id"),
        file_name: row.get("file_name"),
        file_type: row.get("file_type"),
        file_size: row.get("file_size"),
        storage_key: row.get("storage_key"),
        guest_id: row.get("guest_id"),
        guest_name: row.get("guest_name"),
        uploaded_at: row.get("uploaded_at"),
        status,
        completed_at: row.get("completed_at"),
    })
}

const SELECT_COLUMNS: &str = "id, file_name, file_type, file_size, storage_key, \
     guest_id, guest_name, uploaded_at, status, completed_at";

#[async_trait]
impl MediaStore for PgMediaStore {
    #[tracing::instrument(skip(self, record), fields(db.table = "media", db.operation = "insert", media_id = %record.id))]
    async fn put(&self, record: &MediaRecord) -> Result<(), AppError> {
        // Dynamic SQLx queries avoid requiring DATABASE_URL at compile time.
        sqlx::query(
            r#"
            INSERT INTO media (
                id, file_name, file_type, file_size, storage_key,
                guest_id, guest_name, uploaded_at, status, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(&record.file_name)
        .bind(&record.file_type)
        .bind(record.file_size)
        .bind(&record.storage_key)
        .bind(record.guest_id)
        .bind(&record.guest_name)
        .bind(record.uploaded_at)
        .bind(record.status.as_str())
        .bind(record.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM media WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "update", media_id = %id))]
    async fn complete(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionOutcome, AppError> {
        // Only a pending row is touched, so a repeat confirmation can never
        // move completed_at.
        let result = sqlx::query(
            r#"
            UPDATE media
            SET status = 'completed', completed_at = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(completed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(CompletionOutcome::Completed);
        }

        let exists = sqlx::query("SELECT 1 FROM media WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(if exists.is_some() {
            CompletionOutcome::AlreadyCompleted
        } else {
            CompletionOutcome::Unknown
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    async fn scan_completed(
        &self,
        position: Option<ScanPosition>,
        limit: i64,
    ) -> Result<MediaScanPage, AppError> {
        // Fetch one extra row to learn whether more data remains.
        let fetch = limit + 1;

        let rows = match position {
            Some(pos) => {
                sqlx::query(&format!(
                    r#"
                    SELECT {}
                    FROM media
                    WHERE status = 'completed' AND (uploaded_at, id) < ($1, $2)
                    ORDER BY uploaded_at DESC, id DESC
                    LIMIT $3
                    "#,
                    SELECT_COLUMNS
                ))
                .bind(pos.uploaded_at)
                .bind(pos.id)
                .bind(fetch)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    r#"
                    SELECT {}
                    FROM media
                    WHERE status = 'completed'
                    ORDER BY uploaded_at DESC, id DESC
                    LIMIT $1
                    "#,
                    SELECT_COLUMNS
                ))
                .bind(fetch)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let has_more = rows.len() as i64 > limit;
        let mut records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        records.truncate(limit as usize);

        let last_position = if has_more {
            records.last().map(|r| ScanPosition {
                uploaded_at: r.uploaded_at,
                id: r.id,
            })
        } else {
            None
        };

        Ok(MediaScanPage {
            records,
            last_position,
            has_more,
        })
    }

    async fn count_completed(&self) -> Result<u64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM media WHERE status = 'completed'")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("count");
        Ok(count as u64)
    }
}
