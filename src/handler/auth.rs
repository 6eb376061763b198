// handler/auth.rs
use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        jobdtos::ApiResponse,
        userdtos::{FilterUserDto, LoginUserDto, RegisterUserDto, UserLoginResponseDto},
    },
    error::{ErrorMessage, HttpError},
    models::usermodel::UserRole,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if app_state
        .db_client
        .get_user_by_email(&body.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .is_some()
    {
        return Err(HttpError::conflict(ErrorMessage::EmailExist.to_string()));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Self-service registration only hands out customer and provider roles.
    let role = match body.role {
        Some(UserRole::Admin) | None => UserRole::Customer,
        Some(role) => role,
    };

    let user = app_state
        .db_client
        .save_user(body.name, body.email, hashed_password, role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Registration successful",
            FilterUserDto::filter_user(&user),
        )),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user_by_email(&body.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_match = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;
    if !password_match {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build auth cookie".to_string()))?,
    );

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
        user: FilterUserDto::filter_user(&user),
    });

    Ok((headers, response))
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::minutes(-1))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build auth cookie".to_string()))?,
    );

    Ok((
        headers,
        Json(ApiResponse::success("Logged out successfully", ())),
    ))
}
