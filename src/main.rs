mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    bid_service::BidService, dispute_service::DisputeService, event_service::EventPublisher,
    job_service::JobService, media_service::MediaService, review_service::ReviewService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub job_service: Arc<JobService>,
    pub bid_service: Arc<BidService>,
    pub review_service: Arc<ReviewService>,
    pub dispute_service: Arc<DisputeService>,
    pub media_service: MediaService,
    pub events: EventPublisher,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let events = EventPublisher::default();
        let media_service = MediaService::new(&config);

        let job_service = Arc::new(JobService::new(
            db_client_arc.clone(),
            media_service.clone(),
            events.clone(),
        ));
        let bid_service = Arc::new(BidService::new(db_client_arc.clone(), events.clone()));
        let review_service = Arc::new(ReviewService::new(db_client_arc.clone()));
        let dispute_service = Arc::new(DisputeService::new(db_client_arc.clone()));

        Self {
            env: config,
            db_client: db_client_arc,
            job_service,
            bid_service,
            review_service,
            dispute_service,
            media_service,
            events,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        println!("🔥 Failed to run database migrations: {:?}", err);
        std::process::exit(1);
    }

    let db_client = DBClient::new(pool);

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    println!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            println!("🔥 Failed to bind to port {}: {:?}", config.port, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        println!("🔥 Server error: {:?}", err);
        std::process::exit(1);
    }
}
