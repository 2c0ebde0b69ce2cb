use chrono::{DateTime, Utc};
use scoring::ContestRules;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Contest {
    pub code: String,
    pub name: String,
    pub created_by: Option<Uuid>,
    /// Free-form rules blob as saved by the contest owner.
    #[schema(value_type = Object)]
    pub rules: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Contest {
    pub fn contest_rules(&self) -> ContestRules {
        ContestRules::from_json(&self.rules.0)
    }
}
