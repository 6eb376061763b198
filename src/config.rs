// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    // Media store (Cloudinary-style) credentials. Empty means deletes are
    // skipped, never failed.
    pub media_cloud_name: String,
    pub media_api_key: String,
    pub media_api_secret: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let media_cloud_name = std::env::var("MEDIA_CLOUD_NAME")
            .unwrap_or_else(|_| "".to_string());
        let media_api_key = std::env::var("MEDIA_API_KEY")
            .unwrap_or_else(|_| "".to_string());
        let media_api_secret = std::env::var("MEDIA_API_SECRET")
            .unwrap_or_else(|_| "".to_string());

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().expect("JWT_MAXAGE must be a number of minutes"),
            port,
            allowed_origins,
            media_cloud_name,
            media_api_key,
            media_api_secret,
        }
    }
}
