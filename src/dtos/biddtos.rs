use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bidmodel::{Bid, BidStatus};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBidDto {
    #[validate(range(min = 0.01, message = "Bid amount must be positive"))]
    pub amount: f64,

    #[validate(length(min = 1, max = 1000, message = "Message must be between 1 and 1000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidResponseDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub provider_id: Uuid,
    pub amount: f64,
    pub message: String,
    pub status: BidStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl BidResponseDto {
    pub fn from_bid(bid: &Bid) -> Self {
        BidResponseDto {
            id: bid.id,
            job_id: bid.job_id,
            provider_id: bid.provider_id,
            amount: bid.amount.to_f64().unwrap_or(0.0),
            message: bid.message.clone(),
            status: bid.status,
            created_at: bid.created_at,
        }
    }

    pub fn from_bids(bids: &[Bid]) -> Vec<Self> {
        bids.iter().map(Self::from_bid).collect()
    }
}

/// Result of accepting a bid: the assigned job, the winning bid, and how
/// many sibling bids were bulk-rejected in the same transaction.
#[derive(Debug, Serialize)]
pub struct BidAcceptanceResponseDto {
    pub job: crate::dtos::jobdtos::JobResponseDto,
    pub bid: BidResponseDto,
    pub rejected_bids: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn bid_amount_must_be_positive() {
        let dto = CreateBidDto {
            amount: 0.0,
            message: "I can do this".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = CreateBidDto {
            amount: 250.0,
            message: "I can do this".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn bid_message_is_required() {
        let dto = CreateBidDto {
            amount: 100.0,
            message: "".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
