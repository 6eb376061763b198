// handler/reviews.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        jobdtos::ApiResponse,
        reviewdtos::{CreateReviewDto, ProviderReviewsResponseDto, ReviewCreatedResponseDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn reviews_handler() -> Router {
    Router::new()
        .route("/", post(create_review))
        .route("/my", get(get_my_reviews))
}

/// Provider review pages are public.
pub fn public_reviews_handler() -> Router {
    Router::new().route("/provider/:provider_id", get(get_provider_reviews))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (review, provider) = app_state
        .review_service
        .create_review(&auth.user, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Review submitted successfully",
            ReviewCreatedResponseDto { review, provider },
        )),
    ))
}

pub async fn get_provider_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (provider, reviews) = app_state
        .review_service
        .get_provider_reviews(provider_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Provider reviews retrieved successfully",
        ProviderReviewsResponseDto { provider, reviews },
    )))
}

pub async fn get_my_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state.review_service.get_my_reviews(&auth.user).await?;

    Ok(Json(ApiResponse::success(
        "Reviews retrieved successfully",
        reviews,
    )))
}
