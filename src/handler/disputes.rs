// handler/disputes.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        disputedtos::{CreateDisputeDto, SettleDisputeDto},
        jobdtos::ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn disputes_handler() -> Router {
    Router::new()
        .route("/", post(create_dispute))
        .route("/", get(get_my_disputes))
        .route("/all", get(get_all_disputes))
        .route("/:dispute_id", get(get_dispute))
        .route("/:dispute_id/review", put(start_review))
        .route("/:dispute_id/resolve", put(resolve_dispute))
        .route("/:dispute_id/reject", put(reject_dispute))
}

pub async fn create_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let dispute = app_state
        .dispute_service
        .create_dispute(&auth.user, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Dispute opened successfully", dispute)),
    ))
}

pub async fn get_my_disputes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let disputes = app_state
        .dispute_service
        .get_my_disputes(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Disputes retrieved successfully",
        disputes,
    )))
}

pub async fn get_all_disputes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let disputes = app_state
        .dispute_service
        .get_all_disputes(&auth.user)
        .await?;

    Ok(Json(ApiResponse::success(
        "Disputes retrieved successfully",
        disputes,
    )))
}

pub async fn get_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(dispute_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let dispute = app_state
        .dispute_service
        .get_dispute(&auth.user, dispute_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Dispute retrieved successfully",
        dispute,
    )))
}

pub async fn start_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(dispute_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let dispute = app_state
        .dispute_service
        .start_review(&auth.user, dispute_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Dispute moved to review",
        dispute,
    )))
}

pub async fn resolve_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(dispute_id): Path<Uuid>,
    Json(body): Json<SettleDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let dispute = app_state
        .dispute_service
        .resolve_dispute(&auth.user, dispute_id, body.resolution)
        .await?;

    Ok(Json(ApiResponse::success(
        "Dispute resolved successfully",
        dispute,
    )))
}

pub async fn reject_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(dispute_id): Path<Uuid>,
    Json(body): Json<SettleDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let dispute = app_state
        .dispute_service
        .reject_dispute(&auth.user, dispute_id, body.resolution)
        .await?;

    Ok(Json(ApiResponse::success(
        "Dispute rejected successfully",
        dispute,
    )))
}
