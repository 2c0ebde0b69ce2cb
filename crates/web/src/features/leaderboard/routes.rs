use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_leaderboard, get_my_rank};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/:code/leaderboard", get(get_leaderboard))
        .route("/:code/rank/:user_id", get(get_my_rank))
}
