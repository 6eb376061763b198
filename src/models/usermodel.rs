use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Provider,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Provider => "provider",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub skills: Option<Vec<String>>,
    pub profile_image: Option<String>,
    // Rating aggregates, recomputed from the reviews table on every review
    // write and on provider-detail reads.
    pub average_rating: f64,
    pub num_reviews: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_match_database_enum() {
        assert_eq!(UserRole::Customer.to_str(), "customer");
        assert_eq!(UserRole::Provider.to_str(), "provider");
        assert_eq!(UserRole::Admin.to_str(), "admin");
    }
}
