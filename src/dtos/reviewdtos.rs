use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reviewmodel::Review;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReviewDto {
    pub provider_id: Uuid,

    pub job_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 1000, message = "Comment must be between 1 and 1000 characters"))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderRatingDto {
    pub provider_id: Uuid,
    pub name: String,
    pub average_rating: f64,
    pub num_reviews: i64,
}

#[derive(Debug, Serialize)]
pub struct ReviewCreatedResponseDto {
    pub review: Review,
    pub provider: ProviderRatingDto,
}

#[derive(Debug, Serialize)]
pub struct ProviderReviewsResponseDto {
    pub provider: ProviderRatingDto,
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn rating_is_bounded_one_to_five() {
        let mut dto = CreateReviewDto {
            provider_id: Uuid::nil(),
            job_id: Uuid::nil(),
            rating: 0,
            comment: "great work".to_string(),
        };
        assert!(dto.validate().is_err());

        dto.rating = 6;
        assert!(dto.validate().is_err());

        dto.rating = 5;
        assert!(dto.validate().is_ok());
    }
}
