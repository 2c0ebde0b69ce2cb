use std::collections::HashMap;

use scoring::StoredCatch;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Contest;
use crate::repository::{
    catch::CatchRepository, contest::ContestRepository, profile::ProfileRepository,
};

/// Where the leaderboard reads a contest, its catches and the names to show
/// from.
#[async_trait::async_trait]
pub trait ContestSource: Send + Sync {
    async fn contest(&self, code: &str) -> Result<Contest>;

    async fn catches(&self, code: &str) -> Result<Vec<StoredCatch>>;

    /// Display names for the given users. Users without a usable name are
    /// left out of the map.
    async fn display_names(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, String>>;
}

pub struct PgContestSource<'a> {
    pool: &'a PgPool,
}

impl<'a> PgContestSource<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContestSource for PgContestSource<'_> {
    async fn contest(&self, code: &str) -> Result<Contest> {
        ContestRepository::new(self.pool).find_by_code(code).await
    }

    async fn catches(&self, code: &str) -> Result<Vec<StoredCatch>> {
        let rows = CatchRepository::new(self.pool)
            .list_for_contest(code)
            .await?;

        Ok(rows.into_iter().map(StoredCatch::from).collect())
    }

    async fn display_names(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        let profiles = ProfileRepository::new(self.pool)
            .find_many(user_ids)
            .await?;

        Ok(profiles
            .into_iter()
            .filter_map(|p| p.display_name().map(|name| (p.id, name)))
            .collect())
    }
}
