use scoring::CatchStatus;
use sqlx::PgPool;
use storage::{
    dto::catch::CreateCatchRequest,
    error::Result,
    models::Catch,
    services::catches,
};

/// Log a catch in a contest
pub async fn create_catch(pool: &PgPool, code: &str, request: CreateCatchRequest) -> Result<Catch> {
    catches::record_catch(pool, code, request.into()).await
}

/// Approve, reject or re-queue a catch
pub async fn update_catch_status(pool: &PgPool, id: i64, status: CatchStatus) -> Result<Catch> {
    catches::set_catch_status(pool, id, status).await
}
