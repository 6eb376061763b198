use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}
