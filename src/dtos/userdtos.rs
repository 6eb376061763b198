use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::usermodel::{User, UserRole};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    // Defaults to customer when omitted; admins are seeded out of band.
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct LoginUserDto {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User shape returned to clients; never exposes the password hash.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub skills: Vec<String>,
    pub profile_image: Option<String>,
    pub average_rating: f64,
    pub num_reviews: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            phone: user.phone.clone(),
            bio: user.bio.clone(),
            location_city: user.location_city.clone(),
            location_country: user.location_country.clone(),
            skills: user.skills.clone().unwrap_or_default(),
            profile_image: user.profile_image.clone(),
            average_rating: user.average_rating,
            num_reviews: user.num_reviews,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub user: FilterUserDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn register_rejects_short_password() {
        let dto = RegisterUserDto {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            role: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_rejects_bad_email() {
        let dto = RegisterUserDto {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "long-enough".to_string(),
            role: Some(UserRole::Provider),
        };
        assert!(dto.validate().is_err());
    }
}
