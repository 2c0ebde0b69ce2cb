use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use scoring::StoredCatch;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A row of the `catches` table. `points` holds points, grams or a count
/// depending on `value_kind` (or, for legacy rows, on the contest mode).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Catch {
    pub id: i64,
    pub contest_code: String,
    pub user_id: Uuid,
    pub fish_name: Option<String>,
    pub size_cm: Option<Decimal>,
    pub points: Option<i64>,
    pub status: Option<String>,
    pub sub_type: Option<String>,
    pub value_kind: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Catch> for StoredCatch {
    fn from(row: Catch) -> Self {
        StoredCatch {
            contest_code: row.contest_code,
            user_id: row.user_id,
            fish_name: row.fish_name,
            size_cm: row.size_cm,
            points: row.points,
            status: row.status,
            sub_type: row.sub_type,
            value_kind: row.value_kind,
            created_at: row.created_at,
        }
    }
}
