use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "dispute_issue_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisputeIssueType {
    Payment,
    ServiceQuality,
    Fraud,
    Other,
}

impl DisputeIssueType {
    pub fn to_str(&self) -> &str {
        match self {
            DisputeIssueType::Payment => "payment",
            DisputeIssueType::ServiceQuality => "service_quality",
            DisputeIssueType::Fraud => "fraud",
            DisputeIssueType::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "dispute_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    InReview,
    Resolved,
    Rejected,
}

impl DisputeStatus {
    pub fn to_str(&self) -> &str {
        match self {
            DisputeStatus::Open => "open",
            DisputeStatus::InReview => "in_review",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Rejected => "rejected",
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, DisputeStatus::Resolved | DisputeStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dispute {
    pub id: Uuid,
    pub job_id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub issue_type: DisputeIssueType,
    pub description: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Dispute {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.customer_id == user_id || self.provider_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_states_are_resolved_and_rejected() {
        assert!(!DisputeStatus::Open.is_settled());
        assert!(!DisputeStatus::InReview.is_settled());
        assert!(DisputeStatus::Resolved.is_settled());
        assert!(DisputeStatus::Rejected.is_settled());
    }
}
