use crate::domain::{
    shared::{errors::DomainError, pagination::PageCursor},
    submission::{
        entity::{NewSubmission, Submission, SubmissionStatus},
        repository::SubmissionRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const SUBMISSION_COLUMNS: &str = "id, status, caption, image_path, thumb_path, mime, size_bytes, \
     width, height, ip_hash, device_id, fingerprint_hash, user_agent, created_at, updated_at, \
     approved_at, rejected_at, deleted_at, approved_by, rejected_by, deleted_by";

#[derive(FromRow)]
struct SubmissionRow {
    id: Uuid,
    status: String,
    caption: String,
    image_path: String,
    thumb_path: String,
    mime: String,
    size_bytes: i64,
    width: i32,
    height: i32,
    ip_hash: String,
    device_id: String,
    fingerprint_hash: String,
    user_agent: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    approved_by: Option<String>,
    rejected_by: Option<String>,
    deleted_by: Option<String>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = DomainError;

    fn try_from(r: SubmissionRow) -> Result<Self, Self::Error> {
        let status = r.status.parse::<SubmissionStatus>().map_err(|_| {
            DomainError::InfrastructureError(format!(
                "Submission {} has unknown status {:?}",
                r.id, r.status
            ))
        })?;
        Ok(Submission {
            id: r.id,
            status,
            caption: r.caption,
            image_path: r.image_path,
            thumb_path: r.thumb_path,
            mime: r.mime,
            size_bytes: r.size_bytes,
            width: r.width,
            height: r.height,
            ip_hash: r.ip_hash,
            device_id: r.device_id,
            fingerprint_hash: r.fingerprint_hash,
            user_agent: r.user_agent,
            created_at: r.created_at,
            updated_at: r.updated_at,
            approved_at: r.approved_at,
            rejected_at: r.rejected_at,
            deleted_at: r.deleted_at,
            approved_by: r.approved_by,
            rejected_by: r.rejected_by,
            deleted_by: r.deleted_by,
        })
    }
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> DomainError + '_ {
    move |e| {
        error!("{}: {}", context, e);
        DomainError::InfrastructureError(format!("{}: {}", context, e))
    }
}

fn into_submissions(rows: Vec<SubmissionRow>) -> Result<Vec<Submission>, DomainError> {
    rows.into_iter().map(Submission::try_from).collect()
}

pub struct SqlxSubmissionRepository {
    pool: PgPool,
}

impl SqlxSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxSubmissionRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for SqlxSubmissionRepository {
    #[instrument(skip(self, s), fields(id = %s.id))]
    async fn create(&self, s: &NewSubmission) -> Result<Submission, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "INSERT INTO submissions (id, status, caption, image_path, thumb_path, mime, \
             size_bytes, width, height, ip_hash, device_id, fingerprint_hash, user_agent) \
             VALUES ($1, 'pending', $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(s.id)
        .bind(&s.caption)
        .bind(&s.image_path)
        .bind(&s.thumb_path)
        .bind(&s.mime)
        .bind(s.size_bytes)
        .bind(s.width)
        .bind(s.height)
        .bind(&s.ip_hash)
        .bind(&s.device_id)
        .bind(&s.fingerprint_hash)
        .bind(&s.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to insert submission"))?;

        debug!("Inserted pending submission {}", s.id);
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load submission"))?;
        row.map(Submission::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_page(
        &self,
        status: SubmissionStatus,
        after: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Submission>, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE status = "
        ));
        qb.push_bind(status.as_str());

        // Single row comparison: ties on created_at are broken by id.
        if let Some(cursor) = after {
            qb.push(" AND (created_at, id) < (")
                .push_bind(cursor.created_at)
                .push(", ")
                .push_bind(cursor.id)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit);

        let rows = qb
            .build_query_as::<SubmissionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list submissions"))?;
        into_submissions(rows)
    }

    async fn list_for_export(&self) -> Result<Vec<Submission>, DomainError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions \
             WHERE status <> 'deleted' ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list submissions for export"))?;
        into_submissions(rows)
    }

    #[instrument(skip(self))]
    async fn approve(&self, id: Uuid, admin_id: &str) -> Result<Option<Submission>, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "UPDATE submissions SET status = 'approved', \
             approved_at = COALESCE(approved_at, NOW()), \
             approved_by = COALESCE(approved_by, $2), \
             updated_at = NOW() \
             WHERE id = $1 AND status <> 'deleted' \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to approve submission"))?;
        row.map(Submission::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn reject_if_pending(&self, id: Uuid, admin_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE submissions SET status = 'rejected', rejected_at = NOW(), \
             rejected_by = $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(admin_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to reject submission"))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn mark_deleted(
        &self,
        id: Uuid,
        admin_id: &str,
    ) -> Result<Option<Submission>, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "UPDATE submissions SET status = 'deleted', deleted_at = NOW(), \
             deleted_by = $2, updated_at = NOW() \
             WHERE id = $1 AND status <> 'deleted' \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to delete submission"))?;
        row.map(Submission::try_from).transpose()
    }

    async fn update_caption(
        &self,
        id: Uuid,
        caption: &str,
    ) -> Result<Option<Submission>, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "UPDATE submissions SET caption = $2, updated_at = NOW() \
             WHERE id = $1 AND status <> 'deleted' \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(caption)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update caption"))?;
        row.map(Submission::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("Database ping failed"))?;
        Ok(())
    }
}
