// db/reviewdb.rs
use async_trait::async_trait;
use sqlx::{Error, Row};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::Review;

const REVIEW_COLUMNS: &str = r#"
    id, job_id, customer_id, provider_id, rating, comment, created_at
"#;

#[async_trait]
pub trait ReviewExt {
    /// Inserts a review. The unique (job_id, customer_id, provider_id)
    /// index backstops the duplicate check under concurrency.
    async fn create_review(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<Review, Error>;

    async fn get_review_for_job(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Review>, Error>;

    async fn get_reviews_for_provider(&self, provider_id: Uuid) -> Result<Vec<Review>, Error>;

    /// Recomputes the provider's aggregate from the full review set (not
    /// incrementally) and persists it onto the users row. Returns the
    /// rounded average and the review count.
    async fn recompute_provider_rating(&self, provider_id: Uuid) -> Result<(f64, i64), Error>;
}

/// Ratings are displayed to one decimal place; the persisted aggregate is
/// rounded the same way so write-path and read-path agree exactly.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<Review, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (job_id, customer_id, provider_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(customer_id)
        .bind(provider_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_review_for_job(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE job_id = $1 AND customer_id = $2 AND provider_id = $3
            "#
        ))
        .bind(job_id)
        .bind(customer_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_reviews_for_provider(&self, provider_id: Uuid) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE provider_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn recompute_provider_rating(&self, provider_id: Uuid) -> Result<(f64, i64), Error> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(AVG(rating), 0)::FLOAT8 AS average, COUNT(*) AS total
            FROM reviews
            WHERE provider_id = $1
            "#,
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;

        let average: f64 = row.try_get("average")?;
        let total: i64 = row.try_get("total")?;
        let average = round_to_tenth(average);

        sqlx::query(
            r#"
            UPDATE users
            SET average_rating = $2, num_reviews = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(provider_id)
        .bind(average)
        .bind(total as i32)
        .execute(&self.pool)
        .await?;

        Ok((average, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_matches_one_decimal_display() {
        assert_eq!(round_to_tenth(0.0), 0.0);
        assert_eq!(round_to_tenth(5.0), 5.0);
        assert_eq!(round_to_tenth(4.25), 4.3);
        assert_eq!(round_to_tenth(4.24), 4.2);
        // mean of 5 and 4
        assert_eq!(round_to_tenth(4.5), 4.5);
        // mean of 5, 4, 4
        assert_eq!(round_to_tenth(13.0 / 3.0), 4.3);
    }
}
