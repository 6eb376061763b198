// service/bid_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{biddb::BidExt, db::DBClient, jobdb::JobExt},
    dtos::biddtos::CreateBidDto,
    models::{
        bidmodel::{Bid, BidStatus},
        jobmodel::{Job, JobStatus},
        usermodel::{User, UserRole},
    },
    service::{
        error::ServiceError,
        event_service::{DomainEvent, EventPublisher},
        job_service::to_money,
    },
};

#[derive(Debug, Clone)]
pub struct BidService {
    db_client: Arc<DBClient>,
    events: EventPublisher,
}

impl BidService {
    pub fn new(db_client: Arc<DBClient>, events: EventPublisher) -> Self {
        BidService { db_client, events }
    }

    /// Places a pending bid. Checks run in a fixed order so callers get a
    /// stable error for any given state: role, job existence, job closed,
    /// bidding closed, duplicate.
    pub async fn create_bid(
        &self,
        user: &User,
        job_id: Uuid,
        dto: CreateBidDto,
    ) -> Result<Bid, ServiceError> {
        if user.role != UserRole::Provider {
            return Err(ServiceError::RoleRequired(UserRole::Provider));
        }

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let already_bid = self
            .db_client
            .get_bid_for_job_and_provider(job.id, user.id)
            .await?
            .is_some();

        placement_gate(user, &job, already_bid)?;

        let amount = to_money(dto.amount)?;

        // The unique (job_id, provider_id) index catches the race the
        // pre-check above cannot.
        match self
            .db_client
            .create_bid(job.id, user.id, amount, dto.message)
            .await
        {
            Ok(bid) => Ok(bid),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ServiceError::DuplicateBid(job.id, user.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Bid visibility on a job: providers see their own bids, the owning
    /// customer and admins see all of them, anyone else is denied.
    pub async fn get_bids_for_job(
        &self,
        user: &User,
        job_id: Uuid,
    ) -> Result<Vec<Bid>, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        match user.role {
            UserRole::Admin => Ok(self.db_client.get_bids_for_job(job_id).await?),
            UserRole::Customer if job.is_owned_by(user.id) => {
                Ok(self.db_client.get_bids_for_job(job_id).await?)
            }
            UserRole::Provider => Ok(self
                .db_client
                .get_bids_for_job_by_provider(job_id, user.id)
                .await?),
            _ => Err(ServiceError::UnauthorizedJobAccess(user.id, job_id)),
        }
    }

    /// Accepting a bid runs the assignment transaction: assign the job,
    /// accept this bid, reject every other pending bid, atomically. Racing
    /// accepts lose the job compare-and-swap and surface as a conflict with
    /// nothing written.
    pub async fn accept_bid(
        &self,
        user_id: Uuid,
        bid_id: Uuid,
    ) -> Result<(Job, Bid, u64), ServiceError> {
        let bid = self
            .db_client
            .get_bid_by_id(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        let job = self
            .db_client
            .get_job_by_id(bid.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(bid.job_id))?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job.id));
        }
        if bid.status != BidStatus::Pending {
            return Err(ServiceError::BidNotPending(bid_id));
        }

        let (job, bid, rejected) = self
            .db_client
            .accept_bid_for_job(bid_id, job.id, bid.provider_id)
            .await?
            .ok_or(ServiceError::JobAlreadyAssigned(job.id))?;

        self.events.publish(DomainEvent::BidAccepted {
            job_id: job.id,
            bid_id: bid.id,
            provider_id: bid.provider_id,
        });
        self.events.publish(DomainEvent::JobAssigned {
            job_id: job.id,
            customer_id: job.customer_id,
            provider_id: bid.provider_id,
        });

        Ok((job, bid, rejected))
    }

    pub async fn reject_bid(&self, user_id: Uuid, bid_id: Uuid) -> Result<Bid, ServiceError> {
        let bid = self
            .db_client
            .get_bid_by_id(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        let job = self
            .db_client
            .get_job_by_id(bid.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(bid.job_id))?;

        if !job.is_owned_by(user_id) {
            return Err(ServiceError::UnauthorizedJobAccess(user_id, job.id));
        }

        self.db_client
            .transition_bid_if_pending(bid_id, BidStatus::Rejected)
            .await?
            .ok_or(ServiceError::BidNotPending(bid_id))
    }

    /// A provider can withdraw a pending bid; an accepted bid is part of an
    /// assignment and cannot be cancelled here.
    pub async fn cancel_bid(&self, user_id: Uuid, bid_id: Uuid) -> Result<Bid, ServiceError> {
        let bid = self
            .db_client
            .get_bid_by_id(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        if bid.provider_id != user_id {
            return Err(ServiceError::UnauthorizedBidAccess(user_id, bid_id));
        }
        if bid.status == BidStatus::Accepted {
            return Err(ServiceError::BidAlreadyAccepted(bid_id));
        }

        self.db_client
            .transition_bid_if_pending(bid_id, BidStatus::Cancelled)
            .await?
            .ok_or(ServiceError::BidNotPending(bid_id))
    }

    /// Bids the user placed, plus bids received on jobs the user owns.
    pub async fn get_my_bids(&self, user_id: Uuid) -> Result<Vec<Bid>, ServiceError> {
        Ok(self.db_client.get_bids_involving_user(user_id).await?)
    }

    pub async fn get_all_bids(&self, user: &User) -> Result<Vec<Bid>, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::RoleRequired(UserRole::Admin));
        }
        Ok(self.db_client.get_all_bids().await?)
    }
}

/// The bid placement checks in their fixed order: provider role, job not
/// closed, bidding still open, no prior bid from this provider. A given
/// state always yields the same error regardless of how it is reached.
pub(crate) fn placement_gate(user: &User, job: &Job, already_bid: bool) -> Result<(), ServiceError> {
    if user.role != UserRole::Provider {
        return Err(ServiceError::RoleRequired(UserRole::Provider));
    }
    if job.status.is_terminal() {
        return Err(ServiceError::JobClosed(job.id));
    }
    if job.assigned_provider_id.is_some() || job.status != JobStatus::Open {
        return Err(ServiceError::BiddingClosed(job.id));
    }
    if already_bid {
        return Err(ServiceError::DuplicateBid(job.id, user.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::BigDecimal;

    fn open_job() -> Job {
        Job {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            assigned_provider_id: None,
            title: "Paint the fence".to_string(),
            description: "Two coats, weatherproof".to_string(),
            budget: BigDecimal::from(150),
            category: "painting".to_string(),
            location: "Abuja".to_string(),
            attachments: vec![],
            status: JobStatus::Open,
            provider_marked_complete: false,
            customer_confirmed_complete: false,
            assigned_at: None,
            completed_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hash".to_string(),
            role,
            phone: None,
            bio: None,
            location_city: None,
            location_country: None,
            skills: None,
            profile_image: None,
            average_rating: 0.0,
            num_reviews: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn role_is_checked_first() {
        let customer = user_with_role(UserRole::Customer);
        let mut job = open_job();
        job.status = JobStatus::Completed;

        // Wrong role wins over every later failure in the same state.
        let err = placement_gate(&customer, &job, true).unwrap_err();
        assert!(matches!(err, ServiceError::RoleRequired(UserRole::Provider)));
    }

    #[test]
    fn closed_jobs_report_closed_before_duplicate() {
        let provider = user_with_role(UserRole::Provider);

        for status in [JobStatus::Completed, JobStatus::Cancelled] {
            let mut job = open_job();
            job.status = status;
            let err = placement_gate(&provider, &job, true).unwrap_err();
            assert!(matches!(err, ServiceError::JobClosed(_)));
        }
    }

    #[test]
    fn assigned_jobs_close_bidding() {
        let provider = user_with_role(UserRole::Provider);
        let mut job = open_job();
        job.status = JobStatus::Assigned;
        job.assigned_provider_id = Some(Uuid::new_v4());

        let err = placement_gate(&provider, &job, true).unwrap_err();
        assert!(matches!(err, ServiceError::BiddingClosed(_)));
    }

    #[test]
    fn duplicate_is_the_last_check() {
        let provider = user_with_role(UserRole::Provider);
        let job = open_job();

        let err = placement_gate(&provider, &job, true).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateBid(_, _)));

        assert!(placement_gate(&provider, &job, false).is_ok());
    }
}
