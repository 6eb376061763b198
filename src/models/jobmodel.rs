use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled jobs never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// The authoritative lifecycle:
    /// open -> assigned -> in_progress -> completed, with cancellation
    /// reachable from open and assigned only.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Open, JobStatus::Assigned)
                | (JobStatus::Open, JobStatus::Cancelled)
                | (JobStatus::Assigned, JobStatus::InProgress)
                | (JobStatus::Assigned, JobStatus::Cancelled)
                | (JobStatus::InProgress, JobStatus::Completed)
        )
    }

    /// A job accepts edits from its customer only before work starts.
    pub fn is_editable(&self) -> bool {
        matches!(self, JobStatus::Open | JobStatus::Assigned)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub assigned_provider_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub budget: BigDecimal,
    pub category: String,
    pub location: String,
    pub attachments: Vec<String>,
    pub status: JobStatus,
    pub provider_marked_complete: bool,
    pub customer_confirmed_complete: bool,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.customer_id == user_id
    }

    pub fn is_assigned_to(&self, provider_id: Uuid) -> bool {
        self.assigned_provider_id == Some(provider_id)
    }

    /// Deletion is only safe while no provider is engaged: open jobs, or
    /// jobs that already reached a terminal status.
    pub fn is_deletable(&self) -> bool {
        matches!(
            self.status,
            JobStatus::Open | JobStatus::Completed | JobStatus::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_follows_the_state_machine() {
        assert!(JobStatus::Open.can_transition_to(JobStatus::Assigned));
        assert!(JobStatus::Open.can_transition_to(JobStatus::Cancelled));
        assert!(JobStatus::Assigned.can_transition_to(JobStatus::InProgress));
        assert!(JobStatus::Assigned.can_transition_to(JobStatus::Cancelled));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::Completed));
    }

    #[test]
    fn no_transition_out_of_terminal_statuses() {
        for next in [
            JobStatus::Open,
            JobStatus::Assigned,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            assert!(!JobStatus::Completed.can_transition_to(next));
            assert!(!JobStatus::Cancelled.can_transition_to(next));
        }
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn no_skipping_the_completion_handshake() {
        assert!(!JobStatus::Open.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Assigned.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::InProgress.can_transition_to(JobStatus::Cancelled));
    }

    #[test]
    fn edits_allowed_only_before_work_starts() {
        assert!(JobStatus::Open.is_editable());
        assert!(JobStatus::Assigned.is_editable());
        assert!(!JobStatus::InProgress.is_editable());
        assert!(!JobStatus::Completed.is_editable());
        assert!(!JobStatus::Cancelled.is_editable());
    }
}
