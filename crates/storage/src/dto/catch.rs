use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use scoring::{CatchEntry, CatchStatus, SubType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Catch;

/// Request payload for logging a catch
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCatchRequest {
    pub user_id: Uuid,

    #[validate(length(max = 120, message = "Species must be at most 120 characters"))]
    pub species: Option<String>,

    pub size_cm: Option<Decimal>,

    pub weight_kg: Option<Decimal>,

    pub weight_g: Option<Decimal>,

    #[validate(range(min = 1, message = "Count must be at least 1"))]
    pub count: Option<i64>,

    /// Expert contests only: carnassier, carp or coup
    pub sub_type: Option<SubType>,
}

impl From<CreateCatchRequest> for CatchEntry {
    fn from(req: CreateCatchRequest) -> Self {
        CatchEntry {
            user_id: req.user_id,
            species: req.species,
            size_cm: req.size_cm,
            weight_kg: req.weight_kg,
            weight_g: req.weight_g,
            count: req.count,
            sub_type: req.sub_type.unwrap_or_default(),
        }
    }
}

/// Request payload for a moderation decision
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCatchStatusRequest {
    pub status: CatchStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatchResponse {
    pub id: i64,
    pub contest_code: String,
    pub user_id: Uuid,
    pub label: String,
    pub sub_type: Option<String>,
    pub size_cm: Option<Decimal>,
    pub value: Option<i64>,
    pub value_kind: Option<String>,
    pub status: CatchStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Catch> for CatchResponse {
    fn from(catch: Catch) -> Self {
        let label = catch
            .fish_name
            .as_deref()
            .map(|name| scoring::ingest::split_legacy_label(name).1.to_string())
            .unwrap_or_default();

        Self {
            id: catch.id,
            contest_code: catch.contest_code,
            user_id: catch.user_id,
            label,
            sub_type: catch.sub_type,
            size_cm: catch.size_cm,
            value: catch.points,
            value_kind: catch.value_kind,
            status: CatchStatus::from_stored(catch.status.as_deref()),
            created_at: catch.created_at,
        }
    }
}
