// db/biddb.rs
use async_trait::async_trait;
use sqlx::{types::BigDecimal, Error};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{
    bidmodel::{Bid, BidStatus},
    jobmodel::{Job, JobStatus},
};

const BID_COLUMNS: &str = r#"
    id, job_id, provider_id, amount, message, status, created_at, updated_at
"#;

#[async_trait]
pub trait BidExt {
    /// Inserts a pending bid. The unique (job_id, provider_id) index makes
    /// concurrent duplicate creates lose with a unique violation; callers
    /// map that onto the duplicate-bid conflict.
    async fn create_bid(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
        amount: BigDecimal,
        message: String,
    ) -> Result<Bid, Error>;

    async fn get_bid_by_id(&self, bid_id: Uuid) -> Result<Option<Bid>, Error>;

    async fn get_bid_for_job_and_provider(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Bid>, Error>;

    async fn get_bids_for_job(&self, job_id: Uuid) -> Result<Vec<Bid>, Error>;

    async fn get_bids_for_job_by_provider(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Vec<Bid>, Error>;

    async fn get_all_bids(&self) -> Result<Vec<Bid>, Error>;

    /// Bids the user placed, plus bids on jobs the user owns.
    async fn get_bids_involving_user(&self, user_id: Uuid) -> Result<Vec<Bid>, Error>;

    /// The assignment transaction. In a single database transaction:
    /// 1. CAS the job from open/unassigned to assigned (the serialization
    ///    point for racing accepts),
    /// 2. flip the winning bid from pending to accepted,
    /// 3. bulk-reject every other pending bid on the job.
    /// Returns `None` with nothing written if either conditional write
    /// found the row already moved on.
    async fn accept_bid_for_job(
        &self,
        bid_id: Uuid,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<(Job, Bid, u64)>, Error>;

    /// Moves a bid out of `pending`; `None` if it was no longer pending.
    async fn transition_bid_if_pending(
        &self,
        bid_id: Uuid,
        status: BidStatus,
    ) -> Result<Option<Bid>, Error>;
}

#[async_trait]
impl BidExt for DBClient {
    async fn create_bid(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
        amount: BigDecimal,
        message: String,
    ) -> Result<Bid, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            INSERT INTO bids (job_id, provider_id, amount, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(provider_id)
        .bind(amount)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_bid_by_id(&self, bid_id: Uuid) -> Result<Option<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS}
            FROM bids
            WHERE id = $1
            "#
        ))
        .bind(bid_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bid_for_job_and_provider(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS}
            FROM bids
            WHERE job_id = $1 AND provider_id = $2
            "#
        ))
        .bind(job_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bids_for_job(&self, job_id: Uuid) -> Result<Vec<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS}
            FROM bids
            WHERE job_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_bids_for_job_by_provider(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Vec<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS}
            FROM bids
            WHERE job_id = $1 AND provider_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(job_id)
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_bids(&self) -> Result<Vec<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS}
            FROM bids
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_bids_involving_user(&self, user_id: Uuid) -> Result<Vec<Bid>, Error> {
        sqlx::query_as::<_, Bid>(
            r#"
            SELECT
                b.id, b.job_id, b.provider_id, b.amount, b.message, b.status,
                b.created_at, b.updated_at
            FROM bids b
            JOIN jobs j ON j.id = b.job_id
            WHERE b.provider_id = $1 OR j.customer_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn accept_bid_for_job(
        &self,
        bid_id: Uuid,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<(Job, Bid, u64)>, Error> {
        let mut tx = self.pool.begin().await?;

        // Job CAS first: if this loses, the whole accept loses and the
        // transaction unwinds with no bid writes visible.
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET assigned_provider_id = $2,
                status = $3,
                assigned_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status = $4
              AND assigned_provider_id IS NULL
            RETURNING
                id, customer_id, assigned_provider_id,
                title, description, budget, category, location, attachments,
                status, provider_marked_complete, customer_confirmed_complete,
                assigned_at, completed_at, created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(provider_id)
        .bind(JobStatus::Assigned)
        .bind(JobStatus::Open)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job) = job else {
            tx.rollback().await?;
            return Ok(None);
        };

        let bid = sqlx::query_as::<_, Bid>(&format!(
            r#"
            UPDATE bids
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(bid_id)
        .bind(BidStatus::Accepted)
        .bind(BidStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(bid) = bid else {
            tx.rollback().await?;
            return Ok(None);
        };

        let rejected = sqlx::query(
            r#"
            UPDATE bids
            SET status = $3, updated_at = NOW()
            WHERE job_id = $1 AND id <> $2 AND status = $4
            "#,
        )
        .bind(job_id)
        .bind(bid_id)
        .bind(BidStatus::Rejected)
        .bind(BidStatus::Pending)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(Some((job, bid, rejected)))
    }

    async fn transition_bid_if_pending(
        &self,
        bid_id: Uuid,
        status: BidStatus,
    ) -> Result<Option<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            UPDATE bids
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(bid_id)
        .bind(status)
        .bind(BidStatus::Pending)
        .fetch_optional(&self.pool)
        .await
    }
}
