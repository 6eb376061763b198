use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

impl BidStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
            BidStatus::Cancelled => "cancelled",
            BidStatus::Completed => "completed",
        }
    }

    /// Every status except pending is terminal for a bid.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BidStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub job_id: Uuid,
    pub provider_id: Uuid,
    pub amount: BigDecimal,
    pub message: String,
    pub status: BidStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_bids_can_still_move() {
        assert!(!BidStatus::Pending.is_terminal());
        assert!(BidStatus::Accepted.is_terminal());
        assert!(BidStatus::Rejected.is_terminal());
        assert!(BidStatus::Cancelled.is_terminal());
        assert!(BidStatus::Completed.is_terminal());
    }
}
