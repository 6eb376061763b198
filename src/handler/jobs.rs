// handler/jobs.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::jobdtos::{
        ApiResponse, AssignProviderDto, CreateJobDto, JobResponseDto, RemoveJobImagesDto,
        UpdateJobDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

/// Job browsing is open to anonymous visitors.
pub fn public_jobs_handler() -> Router {
    Router::new()
        .route("/", get(browse_jobs))
        .route("/:job_id", get(get_job))
}

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/create", post(create_job))
        .route("/my", get(get_my_jobs))
        .route("/assigned", get(get_assigned_jobs))
        .route("/active", get(get_active_jobs))
        .route("/pending-completion", get(get_pending_completion_jobs))
        .route("/completed", get(get_completed_jobs))
        .route("/:job_id/update", put(update_job))
        .route("/:job_id/delete", delete(delete_job))
        .route("/:job_id/images", delete(remove_job_images))
        .route("/:job_id/cancel", put(cancel_job))
        .route("/:job_id/assign", put(assign_provider))
        .route("/:job_id/complete", put(mark_complete))
        .route("/:job_id/confirm-completion", put(confirm_completion))
}

pub async fn browse_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.job_service.browse_jobs().await?;

    Ok(Json(ApiResponse::success(
        "Jobs retrieved successfully",
        JobResponseDto::from_jobs(&jobs),
    )))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(job_id).await?;

    Ok(Json(ApiResponse::success(
        "Job retrieved successfully",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state.job_service.create_job(&auth.user, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Job created successfully",
            JobResponseDto::from_job(&job),
        )),
    ))
}

pub async fn update_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<UpdateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .update_job(auth.user.id, job_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job updated successfully",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn remove_job_images(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<RemoveJobImagesDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .remove_attachments(auth.user.id, job_id, body.image_urls)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job images removed successfully",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn delete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .job_service
        .delete_job(auth.user.id, job_id)
        .await?;

    Ok(Json(ApiResponse::success("Job deleted successfully", ())))
}

pub async fn cancel_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .cancel_job(auth.user.id, job_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job cancelled successfully",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn assign_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<AssignProviderDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .assign_provider(auth.user.id, job_id, body.provider_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Provider assigned successfully",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn mark_complete(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .mark_provider_complete(auth.user.id, job_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job marked as complete, awaiting customer confirmation",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn confirm_completion(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .confirm_customer_complete(auth.user.id, job_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Job completion confirmed",
        JobResponseDto::from_job(&job),
    )))
}

pub async fn get_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.job_service.get_my_jobs(auth.user.id).await?;

    Ok(Json(ApiResponse::success(
        "Jobs retrieved successfully",
        JobResponseDto::from_jobs(&jobs),
    )))
}

pub async fn get_assigned_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.job_service.get_assigned_jobs(&auth.user).await?;

    Ok(Json(ApiResponse::success(
        "Assigned jobs retrieved successfully",
        JobResponseDto::from_jobs(&jobs),
    )))
}

pub async fn get_active_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.job_service.get_active_jobs(&auth.user).await?;

    Ok(Json(ApiResponse::success(
        "Active jobs retrieved successfully",
        JobResponseDto::from_jobs(&jobs),
    )))
}

pub async fn get_pending_completion_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .job_service
        .get_pending_completion_jobs(&auth.user)
        .await?;

    Ok(Json(ApiResponse::success(
        "Jobs awaiting confirmation retrieved successfully",
        JobResponseDto::from_jobs(&jobs),
    )))
}

pub async fn get_completed_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.job_service.get_completed_jobs(&auth.user).await?;

    Ok(Json(ApiResponse::success(
        "Completed jobs retrieved successfully",
        JobResponseDto::from_jobs(&jobs),
    )))
}
