// db/userdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, UserRole};

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    async fn save_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> Result<User, Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, role,
                phone, bio, location_city, location_country,
                skills, profile_image,
                average_rating, num_reviews,
                created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, role,
                phone, bio, location_city, location_country,
                skills, profile_image,
                average_rating, num_reviews,
                created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, name, email, password, role,
                phone, bio, location_city, location_country,
                skills, profile_image,
                average_rating, num_reviews,
                created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }
}
