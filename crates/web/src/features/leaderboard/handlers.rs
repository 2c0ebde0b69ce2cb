use axum::{
    Json,
    extract::{Path, State},
};
use storage::{
    Database,
    dto::leaderboard::{LeaderboardResponse, MyRankResponse},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/contests/{code}/leaderboard",
    params(
        ("code" = String, Path, description = "Contest join code")
    ),
    responses(
        (status = 200, description = "Leaderboard computed", body = LeaderboardResponse),
        (status = 404, description = "Contest not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Path(code): Path<String>,
) -> Result<Json<LeaderboardResponse>, WebError> {
    let leaderboard = services::get_leaderboard(db.pool(), &code).await?;

    tracing::info!(
        contest = %code,
        participants = leaderboard.total_participants,
        policy = %leaderboard.policy_label,
        "Leaderboard served"
    );

    Ok(Json(leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/contests/{code}/rank/{user_id}",
    params(
        ("code" = String, Path, description = "Contest join code"),
        ("user_id" = Uuid, Path, description = "Participant id")
    ),
    responses(
        (status = 200, description = "Participant standing, ranked or unranked", body = MyRankResponse),
        (status = 404, description = "Contest not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_my_rank(
    State(db): State<Database>,
    Path((code, user_id)): Path<(String, Uuid)>,
) -> Result<Json<MyRankResponse>, WebError> {
    let rank = services::get_my_rank(db.pool(), &code, user_id).await?;

    Ok(Json(rank))
}
