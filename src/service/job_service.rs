// service/job_service.rs
use std::sync::Arc;

use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, jobdb::JobExt, userdb::UserExt},
    dtos::jobdtos::{CreateJobDto, UpdateJobDto},
    models::{
        jobmodel::{Job, JobStatus},
        usermodel::{User, UserRole},
    },
    service::{
        error::ServiceError,
        event_service::{DomainEvent, EventPublisher},
        media_service::MediaService,
    },
};

#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    media_service: MediaService,
    events: EventPublisher,
}

impl JobService {
    pub fn new(
        db_client: Arc<DBClient>,
        media_service: MediaService,
        events: EventPublisher,
    ) -> Self {
        JobService {
            db_client,
            media_service,
            events,
        }
    }

    pub async fn create_job(&self, user: &User, dto: CreateJobDto) -> Result<Job, ServiceError> {
        if user.role != UserRole::Customer {
            return Err(ServiceError::RoleRequired(UserRole::Customer));
        }

        let budget = to_money(dto.budget)?;

        let job = self
            .db_client
            .create_job(
                user.id,
                dto.title,
                dto.description,
                budget,
                dto.category,
                dto.location,
                dto.attachments.unwrap_or_default(),
            )
            .await?;

        Ok(job)
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    pub async fn browse_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        Ok(self.db_client.get_all_jobs().await?)
    }

    /// Patch edits from the owning customer. New attachments append; the
    /// status field is never writable through this path.
    pub async fn update_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        dto: UpdateJobDto,
    ) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job_id));
        }
        if !job.status.is_editable() {
            return Err(ServiceError::JobNotEditable(job_id, job.status));
        }

        let budget = match dto.budget {
            Some(value) => Some(to_money(value)?),
            None => None,
        };

        let mut attachments = job.attachments.clone();
        if let Some(new_urls) = dto.attachments {
            for url in new_urls {
                if !attachments.contains(&url) {
                    attachments.push(url);
                }
            }
        }

        let updated = self
            .db_client
            .update_job_fields(
                job_id,
                dto.title,
                dto.description,
                budget,
                dto.category,
                dto.location,
                attachments,
            )
            .await?;

        Ok(updated)
    }

    /// Removes attachment URLs from the job, then cleans the media store.
    /// The cleanup is best-effort and cannot fail the removal.
    pub async fn remove_attachments(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        image_urls: Vec<String>,
    ) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job_id));
        }
        if !job.status.is_editable() {
            return Err(ServiceError::JobNotEditable(job_id, job.status));
        }

        let removed: Vec<String> = job
            .attachments
            .iter()
            .filter(|url| image_urls.contains(url))
            .cloned()
            .collect();
        if removed.is_empty() {
            return Err(ServiceError::Validation(
                "None of the given images belong to this job".to_string(),
            ));
        }

        let remaining: Vec<String> = job
            .attachments
            .iter()
            .filter(|url| !image_urls.contains(url))
            .cloned()
            .collect();

        let updated = self.db_client.set_job_attachments(job_id, remaining).await?;

        self.media_service.delete_attachments(&removed).await;

        Ok(updated)
    }

    pub async fn delete_job(&self, user_id: Uuid, job_id: Uuid) -> Result<(), ServiceError> {
        let job = self.get_job(job_id).await?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job_id));
        }
        if !job.is_deletable() {
            return Err(ServiceError::JobDeletionBlocked(job_id));
        }

        self.db_client.delete_job(job_id).await?;

        self.media_service.delete_attachments(&job.attachments).await;

        Ok(())
    }

    pub async fn cancel_job(&self, user_id: Uuid, job_id: Uuid) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job_id));
        }
        if !job.status.can_transition_to(JobStatus::Cancelled) {
            return Err(ServiceError::CancelNotAllowed(job_id, job.status));
        }

        // Conditional in the database as well, in case the status moved
        // between the read above and the write.
        match self.db_client.cancel_job_if_cancellable(job_id).await? {
            Some(cancelled) => Ok(cancelled),
            None => Err(ServiceError::CancelNotAllowed(job_id, job.status)),
        }
    }

    /// Direct assignment by the owning customer, outside the bid flow. Uses
    /// the same compare-and-swap as bid acceptance, so a job can never be
    /// assigned twice no matter which path races.
    pub async fn assign_provider(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job_id));
        }

        let provider = self
            .db_client
            .get_user(provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;
        if provider.role != UserRole::Provider {
            return Err(ServiceError::ProviderNotFound(provider_id));
        }

        let assigned = self
            .db_client
            .assign_provider_if_open(job_id, provider_id)
            .await?
            .ok_or(ServiceError::JobAlreadyAssigned(job_id))?;

        self.events.publish(DomainEvent::JobAssigned {
            job_id,
            customer_id: assigned.customer_id,
            provider_id,
        });

        Ok(assigned)
    }

    /// Provider half of the completion handshake: flags the work done and
    /// moves the job to in_progress pending customer confirmation.
    pub async fn mark_provider_complete(
        &self,
        provider_id: Uuid,
        job_id: Uuid,
    ) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        mark_complete_gate(&job, provider_id)?;

        match self.db_client.mark_provider_complete(job_id).await? {
            Some(updated) => Ok(updated),
            None => Err(ServiceError::AlreadyMarkedComplete(job_id)),
        }
    }

    /// Customer half of the handshake. Requires the provider flag first;
    /// on success the job reaches `completed` and the event is emitted.
    pub async fn confirm_customer_complete(
        &self,
        customer_id: Uuid,
        job_id: Uuid,
    ) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;

        confirm_complete_gate(&job, customer_id)?;

        let completed = self
            .db_client
            .confirm_customer_complete(job_id)
            .await?
            .ok_or(ServiceError::AlreadyConfirmed(job_id))?;

        if let Some(provider_id) = completed.assigned_provider_id {
            self.events.publish(DomainEvent::JobCompleted {
                job_id,
                customer_id: completed.customer_id,
                provider_id,
            });
        }

        Ok(completed)
    }

    pub async fn get_my_jobs(&self, customer_id: Uuid) -> Result<Vec<Job>, ServiceError> {
        Ok(self.db_client.get_jobs_by_customer(customer_id).await?)
    }

    pub async fn get_assigned_jobs(&self, user: &User) -> Result<Vec<Job>, ServiceError> {
        let jobs = match user.role {
            UserRole::Provider => self.db_client.get_assigned_jobs_for_provider(user.id).await?,
            UserRole::Customer => self.db_client.get_assigned_jobs_for_customer(user.id).await?,
            UserRole::Admin => self.db_client.get_all_assigned_jobs().await?,
        };
        Ok(jobs)
    }

    pub async fn get_active_jobs(&self, user: &User) -> Result<Vec<Job>, ServiceError> {
        let jobs = match user.role {
            UserRole::Provider => self.db_client.get_active_jobs_for_provider(user.id).await?,
            _ => self.db_client.get_active_jobs_for_customer(user.id).await?,
        };
        Ok(jobs)
    }

    /// Jobs the provider marked complete that still await confirmation.
    pub async fn get_pending_completion_jobs(
        &self,
        user: &User,
    ) -> Result<Vec<Job>, ServiceError> {
        if user.role != UserRole::Provider {
            return Err(ServiceError::RoleRequired(UserRole::Provider));
        }
        Ok(self.db_client.get_provider_pending_jobs(user.id).await?)
    }

    pub async fn get_completed_jobs(&self, user: &User) -> Result<Vec<Job>, ServiceError> {
        if user.role != UserRole::Provider {
            return Err(ServiceError::RoleRequired(UserRole::Provider));
        }
        Ok(self.db_client.get_provider_completed_jobs(user.id).await?)
    }
}

/// Budgets arrive as JSON numbers and are stored as NUMERIC; non-finite
/// values cannot be represented and are rejected up front.
pub fn to_money(value: f64) -> Result<BigDecimal, ServiceError> {
    BigDecimal::try_from(value)
        .map_err(|_| ServiceError::Validation("Amount is not a valid number".to_string()))
}

/// Checks for the provider half of the completion handshake, in a fixed
/// order: caller is the assigned provider, then the flag is still unset.
pub(crate) fn mark_complete_gate(job: &Job, provider_id: Uuid) -> Result<(), ServiceError> {
    if !job.is_assigned_to(provider_id) {
        return Err(ServiceError::UnauthorizedJobAccess(provider_id, job.id));
    }
    if job.provider_marked_complete {
        return Err(ServiceError::AlreadyMarkedComplete(job.id));
    }
    Ok(())
}

/// Checks for the customer half: ownership, then the provider flag must be
/// set (the precondition), then the customer flag must still be unset.
pub(crate) fn confirm_complete_gate(job: &Job, customer_id: Uuid) -> Result<(), ServiceError> {
    if !job.is_owned_by(customer_id) {
        return Err(ServiceError::UnauthorizedJobAccess(customer_id, job.id));
    }
    if !job.provider_marked_complete {
        return Err(ServiceError::ProviderNotMarkedComplete(job.id));
    }
    if job.customer_confirmed_complete {
        return Err(ServiceError::AlreadyConfirmed(job.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use num_traits::ToPrimitive;

    fn assigned_job(provider_id: Uuid) -> Job {
        Job {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            assigned_provider_id: Some(provider_id),
            title: "Fix kitchen sink".to_string(),
            description: "Leaking trap under the sink".to_string(),
            budget: BigDecimal::from(300),
            category: "plumbing".to_string(),
            location: "Lagos".to_string(),
            attachments: vec![],
            status: JobStatus::Assigned,
            provider_marked_complete: false,
            customer_confirmed_complete: false,
            assigned_at: None,
            completed_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn money_conversion_round_trips_ordinary_amounts() {
        let amount = to_money(249.99).unwrap();
        assert!((amount.to_f64().unwrap() - 249.99).abs() < 1e-9);
    }

    #[test]
    fn money_conversion_rejects_non_finite_values() {
        assert!(to_money(f64::NAN).is_err());
        assert!(to_money(f64::INFINITY).is_err());
    }

    #[test]
    fn only_the_assigned_provider_can_mark_complete() {
        let provider_id = Uuid::new_v4();
        let job = assigned_job(provider_id);

        let err = mark_complete_gate(&job, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ServiceError::UnauthorizedJobAccess(_, _)));

        assert!(mark_complete_gate(&job, provider_id).is_ok());
    }

    #[test]
    fn marking_complete_twice_is_a_conflict() {
        let provider_id = Uuid::new_v4();
        let mut job = assigned_job(provider_id);
        job.provider_marked_complete = true;
        job.status = JobStatus::InProgress;

        let err = mark_complete_gate(&job, provider_id).unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyMarkedComplete(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn confirming_before_the_provider_marks_is_a_failed_precondition() {
        let job = assigned_job(Uuid::new_v4());

        let err = confirm_complete_gate(&job, job.customer_id).unwrap_err();
        assert!(matches!(err, ServiceError::ProviderNotMarkedComplete(_)));
        assert_eq!(err.status_code(), StatusCode::PRECONDITION_FAILED);
    }

    #[test]
    fn confirming_twice_is_a_conflict() {
        let mut job = assigned_job(Uuid::new_v4());
        job.provider_marked_complete = true;
        job.customer_confirmed_complete = true;
        job.status = JobStatus::Completed;

        let err = confirm_complete_gate(&job, job.customer_id).unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyConfirmed(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn ownership_is_checked_before_the_completion_flags() {
        let mut job = assigned_job(Uuid::new_v4());
        job.provider_marked_complete = true;

        let err = confirm_complete_gate(&job, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ServiceError::UnauthorizedJobAccess(_, _)));
    }
}
