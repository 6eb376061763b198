// db/disputedb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::disputemodel::{Dispute, DisputeIssueType, DisputeStatus};

const DISPUTE_COLUMNS: &str = r#"
    id, job_id, customer_id, provider_id, issue_type, description,
    status, resolution, reviewed_by, created_at, updated_at, resolved_at
"#;

#[async_trait]
pub trait DisputeExt {
    async fn create_dispute(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
        issue_type: DisputeIssueType,
        description: String,
    ) -> Result<Dispute, Error>;

    async fn get_dispute_by_id(&self, dispute_id: Uuid) -> Result<Option<Dispute>, Error>;

    async fn get_disputes_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, Error>;

    async fn get_all_disputes(&self) -> Result<Vec<Dispute>, Error>;

    /// Moves an open dispute into review under the given admin; `None` if
    /// the dispute already left `open`.
    async fn start_dispute_review(
        &self,
        dispute_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Option<Dispute>, Error>;

    /// Settles a dispute (resolved or rejected), recording the resolution
    /// text and the reviewing admin for audit. `None` if already settled.
    async fn settle_dispute(
        &self,
        dispute_id: Uuid,
        status: DisputeStatus,
        resolution: String,
        admin_id: Uuid,
    ) -> Result<Option<Dispute>, Error>;
}

#[async_trait]
impl DisputeExt for DBClient {
    async fn create_dispute(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
        issue_type: DisputeIssueType,
        description: String,
    ) -> Result<Dispute, Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            r#"
            INSERT INTO disputes (job_id, customer_id, provider_id, issue_type, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DISPUTE_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(customer_id)
        .bind(provider_id)
        .bind(issue_type)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_dispute_by_id(&self, dispute_id: Uuid) -> Result<Option<Dispute>, Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            r#"
            SELECT {DISPUTE_COLUMNS}
            FROM disputes
            WHERE id = $1
            "#
        ))
        .bind(dispute_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_disputes_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            r#"
            SELECT {DISPUTE_COLUMNS}
            FROM disputes
            WHERE customer_id = $1 OR provider_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_disputes(&self) -> Result<Vec<Dispute>, Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            r#"
            SELECT {DISPUTE_COLUMNS}
            FROM disputes
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn start_dispute_review(
        &self,
        dispute_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Option<Dispute>, Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            r#"
            UPDATE disputes
            SET status = $2, reviewed_by = $3, updated_at = NOW()
            WHERE id = $1 AND status = $4
            RETURNING {DISPUTE_COLUMNS}
            "#
        ))
        .bind(dispute_id)
        .bind(DisputeStatus::InReview)
        .bind(admin_id)
        .bind(DisputeStatus::Open)
        .fetch_optional(&self.pool)
        .await
    }

    async fn settle_dispute(
        &self,
        dispute_id: Uuid,
        status: DisputeStatus,
        resolution: String,
        admin_id: Uuid,
    ) -> Result<Option<Dispute>, Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            r#"
            UPDATE disputes
            SET status = $2,
                resolution = $3,
                reviewed_by = $4,
                resolved_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('open', 'in_review')
            RETURNING {DISPUTE_COLUMNS}
            "#
        ))
        .bind(dispute_id)
        .bind(status)
        .bind(resolution)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await
    }
}
