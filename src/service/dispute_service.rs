// service/dispute_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, disputedb::DisputeExt, jobdb::JobExt},
    dtos::disputedtos::CreateDisputeDto,
    models::{
        disputemodel::{Dispute, DisputeStatus},
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct DisputeService {
    db_client: Arc<DBClient>,
}

impl DisputeService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        DisputeService { db_client }
    }

    /// Opens a dispute on an assigned job. Either side of the engagement
    /// can raise it; the counterparty is derived from the job itself.
    pub async fn create_dispute(
        &self,
        user: &User,
        dto: CreateDisputeDto,
    ) -> Result<Dispute, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(dto.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(dto.job_id))?;

        let provider_id = job.assigned_provider_id.ok_or_else(|| {
            ServiceError::Validation("Job has no assigned provider to dispute".to_string())
        })?;

        if user.id != job.customer_id && user.id != provider_id {
            return Err(ServiceError::UnauthorizedJobAccess(user.id, job.id));
        }

        let dispute = self
            .db_client
            .create_dispute(
                job.id,
                job.customer_id,
                provider_id,
                dto.issue_type,
                dto.description,
            )
            .await?;

        Ok(dispute)
    }

    pub async fn get_my_disputes(&self, user_id: Uuid) -> Result<Vec<Dispute>, ServiceError> {
        Ok(self.db_client.get_disputes_for_user(user_id).await?)
    }

    /// Participants and admins can read a dispute; anyone else is denied.
    pub async fn get_dispute(&self, user: &User, dispute_id: Uuid) -> Result<Dispute, ServiceError> {
        let dispute = self
            .db_client
            .get_dispute_by_id(dispute_id)
            .await?
            .ok_or(ServiceError::DisputeNotFound(dispute_id))?;

        if user.role != UserRole::Admin && !dispute.involves(user.id) {
            return Err(ServiceError::UnauthorizedDisputeAccess(user.id, dispute_id));
        }

        Ok(dispute)
    }

    pub async fn get_all_disputes(&self, user: &User) -> Result<Vec<Dispute>, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::RoleRequired(UserRole::Admin));
        }
        Ok(self.db_client.get_all_disputes().await?)
    }

    /// Admin takes an open dispute into review.
    pub async fn start_review(
        &self,
        user: &User,
        dispute_id: Uuid,
    ) -> Result<Dispute, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::RoleRequired(UserRole::Admin));
        }

        let dispute = self
            .db_client
            .get_dispute_by_id(dispute_id)
            .await?
            .ok_or(ServiceError::DisputeNotFound(dispute_id))?;
        if dispute.status.is_settled() {
            return Err(ServiceError::DisputeAlreadySettled(dispute_id));
        }

        self.db_client
            .start_dispute_review(dispute_id, user.id)
            .await?
            .ok_or(ServiceError::DisputeNotOpen(dispute_id))
    }

    pub async fn resolve_dispute(
        &self,
        user: &User,
        dispute_id: Uuid,
        resolution: String,
    ) -> Result<Dispute, ServiceError> {
        self.settle(user, dispute_id, DisputeStatus::Resolved, resolution)
            .await
    }

    pub async fn reject_dispute(
        &self,
        user: &User,
        dispute_id: Uuid,
        resolution: String,
    ) -> Result<Dispute, ServiceError> {
        self.settle(user, dispute_id, DisputeStatus::Rejected, resolution)
            .await
    }

    /// Settlement is admin-only and terminal: the conditional update only
    /// fires while the dispute is still open or in review.
    async fn settle(
        &self,
        user: &User,
        dispute_id: Uuid,
        status: DisputeStatus,
        resolution: String,
    ) -> Result<Dispute, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::RoleRequired(UserRole::Admin));
        }

        if self
            .db_client
            .get_dispute_by_id(dispute_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::DisputeNotFound(dispute_id));
        }

        self.db_client
            .settle_dispute(dispute_id, status, resolution, user.id)
            .await?
            .ok_or(ServiceError::DisputeAlreadySettled(dispute_id))
    }
}
