use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gala_core::models::GuestRecord;
use gala_core::AppError;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::traits::GuestStore;

/// Postgres guest store.
///
/// The `name` column carries a non-unique index: duplicates from racing
/// first uploads are accepted, and `find_by_name` resolves to the oldest row.
#[derive(Clone)]
pub struct PgGuestStore {
    pool: PgPool,
}

impl PgGuestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> GuestRecord {
    GuestRecord {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        last_upload: row.get("last_upload"),
    }
}

#[async_trait]
impl GuestStore for PgGuestStore {
    #[tracing::instrument(skip(self, record), fields(db.table = "guests", db.operation = "upsert", guest_id = %record.id))]
    async fn put(&self, record: &GuestRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO guests (id, name, created_at, last_upload)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, last_upload = EXCLUDED.last_upload
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(record.created_at)
        .bind(record.last_upload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<GuestRecord>, AppError> {
        let row = sqlx::query("SELECT id, name, created_at, last_upload FROM guests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_record))
    }

    #[tracing::instrument(skip(self), fields(db.table = "guests", db.operation = "select"))]
    async fn find_by_name(&self, name: &str) -> Result<Option<GuestRecord>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, last_upload
            FROM guests
            WHERE name = $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_record))
    }

    async fn touch_last_upload(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE guests SET last_upload = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
