use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::catch::{CatchResponse, CreateCatchRequest, UpdateCatchStatusRequest},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/contests/{code}/catches",
    params(
        ("code" = String, Path, description = "Contest join code")
    ),
    request_body = CreateCatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Catch recorded", body = CatchResponse),
        (status = 400, description = "Catch does not satisfy the contest rules"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contest not found")
    ),
    tag = "catches"
)]
pub async fn create_catch(
    State(db): State<Database>,
    Path(code): Path<String>,
    Json(req): Json<CreateCatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let catch = services::create_catch(db.pool(), &code, req).await?;

    Ok((StatusCode::CREATED, Json(CatchResponse::from(catch))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/catches/{id}/status",
    params(
        ("id" = i64, Path, description = "Catch id")
    ),
    request_body = UpdateCatchStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status updated", body = CatchResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Catch not found")
    ),
    tag = "catches"
)]
pub async fn update_catch_status(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCatchStatusRequest>,
) -> Result<Json<CatchResponse>, WebError> {
    let catch = services::update_catch_status(db.pool(), id, req.status).await?;

    Ok(Json(CatchResponse::from(catch)))
}
