use scoring::{ContestStatus, LeaderboardColumns, MyRank, ScoringPolicy, SpeciesColumn};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub contest_code: String,
    pub contest_name: String,
    pub policy: ScoringPolicy,
    pub policy_label: String,
    pub moderation_enabled: bool,
    pub status: ContestStatus,
    pub species_columns: Vec<SpeciesColumn>,
    pub total_participants: u32,
    pub rows: Vec<LeaderboardRowResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardRowResponse {
    pub rank: u32,
    pub user_id: Uuid,
    /// Username, email, or the raw user id when the profile is unknown.
    pub display_name: String,
    #[serde(flatten)]
    pub columns: LeaderboardColumns,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyRankResponse {
    pub contest_code: String,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub standing: MyRank,
}
