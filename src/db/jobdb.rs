// db/jobdb.rs
use async_trait::async_trait;
use sqlx::{types::BigDecimal, Error};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Job, JobStatus};

const JOB_COLUMNS: &str = r#"
    id, customer_id, assigned_provider_id,
    title, description, budget, category, location, attachments,
    status, provider_marked_complete, customer_confirmed_complete,
    assigned_at, completed_at, created_at, updated_at
"#;

#[async_trait]
pub trait JobExt {
    async fn create_job(
        &self,
        customer_id: Uuid,
        title: String,
        description: String,
        budget: BigDecimal,
        category: String,
        location: String,
        attachments: Vec<String>,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_all_jobs(&self) -> Result<Vec<Job>, Error>;

    /// Patch title/description/budget/category/location; `attachments` is
    /// the full merged list the service already computed.
    async fn update_job_fields(
        &self,
        job_id: Uuid,
        title: Option<String>,
        description: Option<String>,
        budget: Option<BigDecimal>,
        category: Option<String>,
        location: Option<String>,
        attachments: Vec<String>,
    ) -> Result<Job, Error>;

    async fn set_job_attachments(
        &self,
        job_id: Uuid,
        attachments: Vec<String>,
    ) -> Result<Job, Error>;

    async fn delete_job(&self, job_id: Uuid) -> Result<(), Error>;

    /// The serialization point for assignment: flips the job to `assigned`
    /// only if it is still open and unassigned. `None` means the
    /// compare-and-swap lost and nothing was written.
    async fn assign_provider_if_open(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Job>, Error>;

    /// Cancels a job still in `open` or `assigned`; `None` if the status
    /// had already moved on.
    async fn cancel_job_if_cancellable(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// Provider half of the completion handshake. Conditional on the flag
    /// still being unset so a duplicate call cannot re-apply it.
    async fn mark_provider_complete(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// Customer half of the completion handshake. Conditional on the
    /// provider flag being set and the customer flag still unset.
    async fn confirm_customer_complete(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_jobs_by_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_assigned_jobs_for_provider(&self, provider_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_assigned_jobs_for_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_all_assigned_jobs(&self) -> Result<Vec<Job>, Error>;

    async fn get_active_jobs_for_provider(&self, provider_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_active_jobs_for_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_provider_pending_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_provider_completed_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, Error>;
}

/// Cancelling releases the provider along with the status flip, keeping the
/// rule that a provider is attached only while the job is assigned, in
/// progress, or completed.
fn cancel_job_sql() -> String {
    format!(
        r#"
        UPDATE jobs
        SET status = $2,
            assigned_provider_id = NULL,
            assigned_at = NULL,
            updated_at = NOW()
        WHERE id = $1
          AND status IN ('open', 'assigned')
        RETURNING {JOB_COLUMNS}
        "#
    )
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        customer_id: Uuid,
        title: String,
        description: String,
        budget: BigDecimal,
        category: String,
        location: String,
        attachments: Vec<String>,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (customer_id, title, description, budget, category, location, attachments)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(category)
        .bind(location)
        .bind(attachments)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE id = $1
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_all_jobs(&self) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn update_job_fields(
        &self,
        job_id: Uuid,
        title: Option<String>,
        description: Option<String>,
        budget: Option<BigDecimal>,
        category: Option<String>,
        location: Option<String>,
        attachments: Vec<String>,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                budget = COALESCE($4, budget),
                category = COALESCE($5, category),
                location = COALESCE($6, location),
                attachments = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(category)
        .bind(location)
        .bind(attachments)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_job_attachments(
        &self,
        job_id: Uuid,
        attachments: Vec<String>,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET attachments = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(attachments)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn assign_provider_if_open(
        &self,
        job_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET assigned_provider_id = $2,
                status = $3,
                assigned_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status = $4
              AND assigned_provider_id IS NULL
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(provider_id)
        .bind(JobStatus::Assigned)
        .bind(JobStatus::Open)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_job_if_cancellable(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&cancel_job_sql())
            .bind(job_id)
            .bind(JobStatus::Cancelled)
            .fetch_optional(&self.pool)
            .await
    }

    async fn mark_provider_complete(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET provider_marked_complete = TRUE,
                status = $2,
                updated_at = NOW()
            WHERE id = $1
              AND provider_marked_complete = FALSE
              AND status = $3
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(JobStatus::InProgress)
        .bind(JobStatus::Assigned)
        .fetch_optional(&self.pool)
        .await
    }

    async fn confirm_customer_complete(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET customer_confirmed_complete = TRUE,
                status = $2,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND provider_marked_complete = TRUE
              AND customer_confirmed_complete = FALSE
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(JobStatus::Completed)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_jobs_by_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_assigned_jobs_for_provider(&self, provider_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE assigned_provider_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_assigned_jobs_for_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE customer_id = $1
              AND assigned_provider_id IS NOT NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_assigned_jobs(&self) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE assigned_provider_id IS NOT NULL
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_active_jobs_for_provider(&self, provider_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE assigned_provider_id = $1
              AND status IN ('assigned', 'in_progress')
            ORDER BY updated_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_active_jobs_for_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE customer_id = $1
              AND status IN ('assigned', 'in_progress')
            ORDER BY updated_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_provider_pending_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE assigned_provider_id = $1
              AND provider_marked_complete = TRUE
              AND customer_confirmed_complete = FALSE
            ORDER BY updated_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_provider_completed_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE assigned_provider_id = $1
              AND customer_confirmed_complete = TRUE
            ORDER BY updated_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelling_releases_the_assigned_provider() {
        let sql = cancel_job_sql();
        assert!(sql.contains("assigned_provider_id = NULL"));
        assert!(sql.contains("assigned_at = NULL"));
    }

    #[test]
    fn cancelling_is_conditional_on_a_cancellable_status() {
        let sql = cancel_job_sql();
        assert!(sql.contains("status IN ('open', 'assigned')"));
    }
}
