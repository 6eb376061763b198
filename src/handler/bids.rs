// handler/bids.rs
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
        biddtos::{BidAcceptanceResponseDto, BidResponseDto, CreateBidDto},
        jobdtos::{ApiResponse, JobResponseDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn bids_handler() -> Router {
    Router::new()
        .route("/job/:job_id", post(create_bid))
        .route("/job/:job_id", get(get_bids_for_job))
        .route("/my", get(get_my_bids))
        .route("/", get(get_all_bids))
        .route("/:bid_id/accept", put(accept_bid))
        .route("/:bid_id/reject", put(reject_bid))
        .route("/:bid_id/cancel", put(cancel_bid))
}

pub async fn create_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bid = app_state
        .bid_service
        .create_bid(&auth.user, job_id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Bid placed successfully",
            BidResponseDto::from_bid(&bid),
        )),
    ))
}

pub async fn get_bids_for_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state
        .bid_service
        .get_bids_for_job(&auth.user, job_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Bids retrieved successfully",
        BidResponseDto::from_bids(&bids),
    )))
}

pub async fn get_my_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state.bid_service.get_my_bids(auth.user.id).await?;

    Ok(Json(ApiResponse::success(
        "Bids retrieved successfully",
        BidResponseDto::from_bids(&bids),
    )))
}

pub async fn get_all_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state.bid_service.get_all_bids(&auth.user).await?;

    Ok(Json(ApiResponse::success(
        "Bids retrieved successfully",
        BidResponseDto::from_bids(&bids),
    )))
}

pub async fn accept_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (job, bid, rejected_bids) = app_state
        .bid_service
        .accept_bid(auth.user.id, bid_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Bid accepted and job assigned",
        BidAcceptanceResponseDto {
            job: JobResponseDto::from_job(&job),
            bid: BidResponseDto::from_bid(&bid),
            rejected_bids,
        },
    )))
}

pub async fn reject_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .reject_bid(auth.user.id, bid_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Bid rejected successfully",
        BidResponseDto::from_bid(&bid),
    )))
}

pub async fn cancel_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .cancel_bid(auth.user.id, bid_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Bid cancelled successfully",
        BidResponseDto::from_bid(&bid),
    )))
}
