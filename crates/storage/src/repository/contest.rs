use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::Contest;

/// Repository for contest lookups
pub struct ContestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContestRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a contest by its join code
    pub async fn find_by_code(&self, code: &str) -> Result<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            SELECT code, name, created_by, rules, created_at
            FROM contests
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(contest)
    }
}
