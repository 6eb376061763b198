// service/error.rs
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::{jobmodel::JobStatus, usermodel::UserRole},
};

/// Domain failures for the marketplace workflows. Every variant maps onto a
/// deterministic status code so handlers never improvise error responses.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Bid not found: {0}")]
    BidNotFound(Uuid),

    #[error("Dispute not found: {0}")]
    DisputeNotFound(Uuid),

    #[error("Provider not found: {0}")]
    ProviderNotFound(Uuid),

    #[error("User {0} does not own job {1}")]
    UnauthorizedJobAccess(Uuid, Uuid),

    #[error("User {0} cannot act on bid {1}")]
    UnauthorizedBidAccess(Uuid, Uuid),

    #[error("User {0} is not a participant in dispute {1}")]
    UnauthorizedDisputeAccess(Uuid, Uuid),

    #[error("Action requires the {} role", .0.to_str())]
    RoleRequired(UserRole),

    #[error("Job {0} is closed and no longer accepts bids")]
    JobClosed(Uuid),

    #[error("Bidding is closed for job {0}")]
    BiddingClosed(Uuid),

    #[error("Provider {1} already placed a bid on job {0}")]
    DuplicateBid(Uuid, Uuid),

    #[error("Job {0} has already been assigned")]
    JobAlreadyAssigned(Uuid),

    #[error("Bid {0} is no longer pending")]
    BidNotPending(Uuid),

    #[error("Bid {0} has been accepted and cannot be cancelled")]
    BidAlreadyAccepted(Uuid),

    #[error("Job {0} is already marked complete by the provider")]
    AlreadyMarkedComplete(Uuid),

    #[error("Job {0} completion is already confirmed")]
    AlreadyConfirmed(Uuid),

    #[error("Provider has not marked job {0} complete")]
    ProviderNotMarkedComplete(Uuid),

    #[error("Job {0} is not completed")]
    JobNotCompleted(Uuid),

    #[error("Job {0} has already been reviewed")]
    DuplicateReview(Uuid),

    #[error("Job {0} cannot be deleted in its current state")]
    JobDeletionBlocked(Uuid),

    #[error("Job {0} cannot be cancelled from status {}", .1.to_str())]
    CancelNotAllowed(Uuid, JobStatus),

    #[error("Job {0} cannot be edited in status {}", .1.to_str())]
    JobNotEditable(Uuid, JobStatus),

    #[error("Dispute {0} is not awaiting review")]
    DisputeNotOpen(Uuid),

    #[error("Dispute {0} has already been settled")]
    DisputeAlreadySettled(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::BidNotFound(_)
            | ServiceError::DisputeNotFound(_)
            | ServiceError::ProviderNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::UnauthorizedJobAccess(_, _)
            | ServiceError::UnauthorizedBidAccess(_, _)
            | ServiceError::UnauthorizedDisputeAccess(_, _)
            | ServiceError::RoleRequired(_) => StatusCode::FORBIDDEN,

            ServiceError::JobClosed(_)
            | ServiceError::BiddingClosed(_)
            | ServiceError::DuplicateBid(_, _)
            | ServiceError::JobAlreadyAssigned(_)
            | ServiceError::BidNotPending(_)
            | ServiceError::BidAlreadyAccepted(_)
            | ServiceError::AlreadyMarkedComplete(_)
            | ServiceError::AlreadyConfirmed(_)
            | ServiceError::DuplicateReview(_)
            | ServiceError::JobDeletionBlocked(_)
            | ServiceError::CancelNotAllowed(_, _)
            | ServiceError::JobNotEditable(_, _)
            | ServiceError::DisputeNotOpen(_)
            | ServiceError::DisputeAlreadySettled(_) => StatusCode::CONFLICT,

            ServiceError::ProviderNotMarkedComplete(_) | ServiceError::JobNotCompleted(_) => {
                StatusCode::PRECONDITION_FAILED
            }

            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let status = err.status_code();
        let message = err.to_string();
        match status {
            StatusCode::NOT_FOUND => HttpError::not_found(message),
            StatusCode::FORBIDDEN => HttpError::forbidden(message),
            StatusCode::CONFLICT => HttpError::conflict(message),
            StatusCode::PRECONDITION_FAILED => HttpError::precondition_failed(message),
            StatusCode::BAD_REQUEST => HttpError::bad_request(message),
            _ => {
                tracing::error!("service failure: {message}");
                HttpError::server_error("Something went wrong".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entities_map_to_not_found() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::JobNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ProviderNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn wrong_principal_maps_to_forbidden() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(
            ServiceError::UnauthorizedJobAccess(a, b).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::RoleRequired(UserRole::Admin).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn state_machine_losers_map_to_conflict() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::JobAlreadyAssigned(id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DuplicateBid(id, id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DisputeAlreadySettled(id).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unmet_prerequisites_map_to_precondition_failed() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::ProviderNotMarkedComplete(id).status_code(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            ServiceError::JobNotCompleted(id).status_code(),
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let err = ServiceError::Database(sqlx::Error::RowNotFound);
        let http: HttpError = err.into();
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.message, "Something went wrong");
    }
}
