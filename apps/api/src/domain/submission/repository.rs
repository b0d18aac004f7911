use super::entity::{NewSubmission, Submission, SubmissionStatus};
use crate::domain::shared::{errors::DomainError, pagination::PageCursor};
use async_trait::async_trait;
use uuid::Uuid;

/// Record store for submissions.
///
/// Every mutating method is a single conditional write. A `None` / `false`
/// result means the predicate did not hold (missing row, deleted row, or for
/// `reject_if_pending` a row that has already left `pending`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: &NewSubmission) -> Result<Submission, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, DomainError>;

    /// Rows with `status`, strictly after `after` in descending
    /// `(created_at, id)` order, newest first, at most `limit` rows.
    async fn list_page(
        &self,
        status: SubmissionStatus,
        after: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Submission>, DomainError>;

    /// Every non-deleted row, newest first.
    async fn list_for_export(&self) -> Result<Vec<Submission>, DomainError>;

    async fn approve(&self, id: Uuid, admin_id: &str) -> Result<Option<Submission>, DomainError>;

    /// Compare-and-set `pending -> rejected`.
    async fn reject_if_pending(&self, id: Uuid, admin_id: &str) -> Result<bool, DomainError>;

    /// Soft delete. Returns the row as it was deleted so its objects can be purged.
    async fn mark_deleted(&self, id: Uuid, admin_id: &str) -> Result<Option<Submission>, DomainError>;

    async fn update_caption(&self, id: Uuid, caption: &str) -> Result<Option<Submission>, DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}
