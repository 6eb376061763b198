// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler,
        bids::bids_handler,
        disputes::disputes_handler,
        jobs::{jobs_handler, public_jobs_handler},
        reviews::{public_reviews_handler, reviews_handler},
        users::{public_users_handler, users_handler},
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Job browsing and provider profiles are public; everything that
    // mutates state goes through the auth layer.
    let job_routes = Router::new()
        .merge(jobs_handler().layer(middleware::from_fn(auth)))
        .merge(public_jobs_handler());

    let review_routes = Router::new()
        .merge(reviews_handler().layer(middleware::from_fn(auth)))
        .merge(public_reviews_handler());

    let user_routes = Router::new()
        .merge(users_handler().layer(middleware::from_fn(auth)))
        .merge(public_users_handler());

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", user_routes)
        .nest("/jobs", job_routes)
        .nest("/bids", bids_handler().layer(middleware::from_fn(auth)))
        .nest("/reviews", review_routes)
        .nest(
            "/disputes",
            disputes_handler().layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
