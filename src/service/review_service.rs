// service/review_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt},
    dtos::reviewdtos::{CreateReviewDto, ProviderRatingDto},
    models::{
        jobmodel::JobStatus,
        reviewmodel::Review,
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
}

impl ReviewService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        ReviewService { db_client }
    }

    /// Leaves a review and recomputes the provider's aggregate in the same
    /// request. Checks run in a fixed order: provider, job completed,
    /// ownership, duplicate.
    pub async fn create_review(
        &self,
        user: &User,
        dto: CreateReviewDto,
    ) -> Result<(Review, ProviderRatingDto), ServiceError> {
        let provider = self
            .db_client
            .get_user(dto.provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(dto.provider_id))?;
        if provider.role != UserRole::Provider {
            return Err(ServiceError::ProviderNotFound(dto.provider_id));
        }

        let job = self
            .db_client
            .get_job_by_id(dto.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(dto.job_id))?;
        if job.status != JobStatus::Completed {
            return Err(ServiceError::JobNotCompleted(job.id));
        }

        if !job.is_owned_by(user.id) {
            return Err(ServiceError::UnauthorizedJobAccess(user.id, job.id));
        }

        if self
            .db_client
            .get_review_for_job(job.id, user.id, provider.id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateReview(job.id));
        }

        let review = match self
            .db_client
            .create_review(job.id, user.id, provider.id, dto.rating, dto.comment)
            .await
        {
            Ok(review) => review,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(ServiceError::DuplicateReview(job.id));
            }
            Err(err) => return Err(err.into()),
        };

        let (average_rating, num_reviews) = self
            .db_client
            .recompute_provider_rating(provider.id)
            .await?;

        let rating = ProviderRatingDto {
            provider_id: provider.id,
            name: provider.name,
            average_rating,
            num_reviews,
        };

        Ok((review, rating))
    }

    /// Public read of a provider's reviews. The aggregate is recomputed on
    /// the way out, so stale stored values self-heal on read.
    pub async fn get_provider_reviews(
        &self,
        provider_id: Uuid,
    ) -> Result<(ProviderRatingDto, Vec<Review>), ServiceError> {
        let provider = self
            .db_client
            .get_user(provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;
        if provider.role != UserRole::Provider {
            return Err(ServiceError::ProviderNotFound(provider_id));
        }

        let (average_rating, num_reviews) =
            self.db_client.recompute_provider_rating(provider_id).await?;

        let reviews = self.db_client.get_reviews_for_provider(provider_id).await?;

        let rating = ProviderRatingDto {
            provider_id,
            name: provider.name,
            average_rating,
            num_reviews,
        };

        Ok((rating, reviews))
    }

    /// Reviews received by the calling provider.
    pub async fn get_my_reviews(&self, user: &User) -> Result<Vec<Review>, ServiceError> {
        if user.role != UserRole::Provider {
            return Err(ServiceError::RoleRequired(UserRole::Provider));
        }
        Ok(self.db_client.get_reviews_for_provider(user.id).await?)
    }
}
