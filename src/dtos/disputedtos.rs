use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::disputemodel::DisputeIssueType;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateDisputeDto {
    pub job_id: Uuid,

    pub issue_type: DisputeIssueType,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SettleDisputeDto {
    #[validate(length(min = 1, max = 2000, message = "Resolution text is required"))]
    pub resolution: String,
}
