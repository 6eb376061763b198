use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::jobmodel::{Job, JobStatus};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: String,

    #[validate(range(min = 0.01, message = "Budget must be positive"))]
    pub budget: f64,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    // Attachment URLs already uploaded to the media store.
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateJobDto {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, message = "Budget must be positive"))]
    pub budget: Option<f64>,

    #[validate(length(min = 1, max = 100, message = "Category cannot be empty"))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Location cannot be empty"))]
    pub location: Option<String>,

    // New attachments append to the existing list; removal goes through the
    // dedicated remove-images operation.
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RemoveJobImagesDto {
    #[validate(length(min = 1, message = "No images provided for removal"))]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignProviderDto {
    pub provider_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponseDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub assigned_provider_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    pub location: String,
    pub attachments: Vec<String>,
    pub status: JobStatus,
    pub provider_marked_complete: bool,
    pub customer_confirmed_complete: bool,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JobResponseDto {
    pub fn from_job(job: &Job) -> Self {
        JobResponseDto {
            id: job.id,
            customer_id: job.customer_id,
            assigned_provider_id: job.assigned_provider_id,
            title: job.title.clone(),
            description: job.description.clone(),
            budget: job.budget.to_f64().unwrap_or(0.0),
            category: job.category.clone(),
            location: job.location.clone(),
            attachments: job.attachments.clone(),
            status: job.status,
            provider_marked_complete: job.provider_marked_complete,
            customer_confirmed_complete: job.customer_confirmed_complete,
            assigned_at: job.assigned_at,
            completed_at: job.completed_at,
            created_at: job.created_at,
        }
    }

    pub fn from_jobs(jobs: &[Job]) -> Vec<Self> {
        jobs.iter().map(Self::from_job).collect()
    }
}

//Response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn base_dto() -> CreateJobDto {
        CreateJobDto {
            title: "Fix kitchen sink".to_string(),
            description: "Leaking trap under the sink".to_string(),
            budget: 300.0,
            category: "plumbing".to_string(),
            location: "Lagos".to_string(),
            attachments: None,
        }
    }

    #[test]
    fn valid_job_passes_validation() {
        assert!(base_dto().validate().is_ok());
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let mut dto = base_dto();
        dto.budget = 0.0;
        assert!(dto.validate().is_err());

        dto.budget = -10.0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut dto = base_dto();
        dto.title = "".to_string();
        assert!(dto.validate().is_err());

        let mut dto = base_dto();
        dto.location = "".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn remove_images_requires_at_least_one_url() {
        let dto = RemoveJobImagesDto { image_urls: vec![] };
        assert!(dto.validate().is_err());
    }
}
