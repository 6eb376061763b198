// handler/users.rs
use std::sync::Arc;

use axum::{extract::Path, response::IntoResponse, routing::get, Extension, Json, Router};
use uuid::Uuid;

use crate::{
    db::{reviewdb::ReviewExt, userdb::UserExt},
    dtos::{jobdtos::ApiResponse, userdtos::FilterUserDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new().route("/me", get(get_me))
}

pub fn public_users_handler() -> Router {
    Router::new().route("/providers/:provider_id", get(get_provider_profile))
}

pub async fn get_me(
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        FilterUserDto::filter_user(&auth.user),
    )))
}

/// Public provider profile. The rating aggregate is recomputed before the
/// profile is read back, so the response always reflects the review set.
pub async fn get_provider_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(provider_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Provider not found".to_string()))?;

    if user.role != UserRole::Provider {
        return Err(HttpError::not_found("Provider not found".to_string()));
    }

    app_state
        .db_client
        .recompute_provider_rating(provider_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(provider_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Provider not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Provider retrieved successfully",
        FilterUserDto::filter_user(&user),
    )))
}
