use scoring::CaptureRecord;
use scoring::ingest::{legacy_label, sub_type_tag, value_kind_tag};
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::Catch;

const CATCH_COLUMNS: &str = "id, contest_code, user_id, fish_name, size_cm, points, status, \
                             sub_type, value_kind, photo_url, created_at";

/// Repository for catch rows
pub struct CatchRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatchRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every catch logged in a contest, whatever its moderation status
    pub async fn list_for_contest(&self, contest_code: &str) -> Result<Vec<Catch>> {
        let catches = sqlx::query_as::<_, Catch>(&format!(
            "SELECT {CATCH_COLUMNS} FROM catches WHERE contest_code = $1 ORDER BY id"
        ))
        .bind(contest_code)
        .fetch_all(self.pool)
        .await?;

        Ok(catches)
    }

    /// Store a validated catch. The label keeps the legacy expert prefix so
    /// older readers still see the sub-type.
    pub async fn insert(&self, record: &CaptureRecord) -> Result<Catch> {
        let value = record.value;

        let catch = sqlx::query_as::<_, Catch>(&format!(
            r#"
            INSERT INTO catches (
                contest_code, user_id, fish_name, size_cm, points, status,
                sub_type, value_kind, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CATCH_COLUMNS}
            "#
        ))
        .bind(&record.contest_code)
        .bind(record.user_id)
        .bind(legacy_label(record.sub_type, &record.label))
        .bind(record.size_cm)
        .bind(value.map(|v| v.raw()))
        .bind(record.status.as_str())
        .bind(sub_type_tag(record.sub_type))
        .bind(value.as_ref().map(value_kind_tag))
        .bind(record.created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(catch)
    }

    /// Record a moderation decision
    pub async fn update_status(&self, id: i64, status: &str) -> Result<Catch> {
        let catch = sqlx::query_as::<_, Catch>(&format!(
            "UPDATE catches SET status = $1 WHERE id = $2 RETURNING {CATCH_COLUMNS}"
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(catch)
    }
}
