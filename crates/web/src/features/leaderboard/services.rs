use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::leaderboard::{LeaderboardResponse, MyRankResponse},
    error::Result,
    services::{leaderboard, source::PgContestSource},
};
use uuid::Uuid;

/// Rank every participant of a contest
pub async fn get_leaderboard(pool: &PgPool, code: &str) -> Result<LeaderboardResponse> {
    let source = PgContestSource::new(pool);
    leaderboard::compute_leaderboard(&source, code, Utc::now()).await
}

/// One participant's position on the same board
pub async fn get_my_rank(pool: &PgPool, code: &str, user_id: Uuid) -> Result<MyRankResponse> {
    let source = PgContestSource::new(pool);
    leaderboard::compute_my_rank(&source, code, user_id).await
}
