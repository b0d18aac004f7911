use super::dto::{AdminSubmissionItem, AdminSubmissionPage, GalleryItem, GalleryPage, PhotoDetail};
use crate::{
    domain::{
        shared::{
            errors::DomainError,
            pagination::{PAGE_SIZE, Page, PageCursor, build_page},
        },
        submission::{
            entity::{Submission, SubmissionStatus},
            repository::SubmissionRepository,
        },
    },
    infrastructure::storage::traits::{Buckets, StorageService},
};
use futures_util::future::join_all;
use std::{sync::Arc, time::Duration};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Lifetime of signed URLs handed out in listings and photo detail.
pub const LISTING_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Keyset listings for the public gallery and the admin status queues.
pub struct ListSubmissionsUseCase {
    repository: Arc<dyn SubmissionRepository>,
    storage: Arc<dyn StorageService>,
    buckets: Buckets,
}

impl ListSubmissionsUseCase {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        storage: Arc<dyn StorageService>,
        buckets: Buckets,
    ) -> Self {
        Self {
            repository,
            storage,
            buckets,
        }
    }

    #[instrument(skip(self))]
    pub async fn gallery(&self, cursor: Option<&str>) -> Result<GalleryPage, DomainError> {
        let page = self.page(SubmissionStatus::Approved, cursor).await?;
        let thumbs = self.sign_thumbs(&page.items).await;
        let items = page
            .items
            .into_iter()
            .zip(thumbs)
            .map(|(s, thumb_url)| GalleryItem {
                id: s.id,
                caption: s.caption,
                created_at: s.created_at,
                thumb_url,
            })
            .collect();
        Ok(GalleryPage {
            items,
            next_cursor: page.next_cursor,
        })
    }

    /// One page of an admin queue. `Deleted` rows are never listed.
    #[instrument(skip(self))]
    pub async fn admin_list(
        &self,
        status: SubmissionStatus,
        cursor: Option<&str>,
    ) -> Result<AdminSubmissionPage, DomainError> {
        if status == SubmissionStatus::Deleted {
            return Err(DomainError::InvalidInput(
                "Deleted submissions are not listed".into(),
            ));
        }
        let page = self.page(status, cursor).await?;
        let thumbs = self.sign_thumbs(&page.items).await;
        let items = page
            .items
            .into_iter()
            .zip(thumbs)
            .map(|(s, thumb_url)| AdminSubmissionItem {
                id: s.id,
                caption: s.caption,
                created_at: s.created_at,
                status: s.status,
                thumb_url,
            })
            .collect();
        Ok(AdminSubmissionPage {
            items,
            next_cursor: page.next_cursor,
        })
    }

    /// Detail view of a single approved photo. Anything else is `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_photo(&self, id: Uuid) -> Result<PhotoDetail, DomainError> {
        let submission = self
            .repository
            .find_by_id(id)
            .await?
            .filter(|s| s.status.is_public())
            .ok_or_else(|| DomainError::NotFound("Photo not found".into()))?;

        let (image_url, thumb_url) = tokio::join!(
            self.storage
                .sign(&self.buckets.photos, &submission.image_path, LISTING_URL_TTL),
            self.storage
                .sign(&self.buckets.thumbs, &submission.thumb_path, LISTING_URL_TTL),
        );

        Ok(PhotoDetail {
            id: submission.id,
            caption: submission.caption,
            created_at: submission.created_at,
            image_url: image_url.unwrap_or_default(),
            thumb_url: thumb_url.unwrap_or_default(),
            width: submission.width,
            height: submission.height,
        })
    }

    async fn page(
        &self,
        status: SubmissionStatus,
        cursor: Option<&str>,
    ) -> Result<Page<Submission>, DomainError> {
        let after = cursor.and_then(|raw| {
            let decoded = PageCursor::decode(raw);
            if decoded.is_none() {
                debug!("Ignoring malformed cursor, restarting from the top");
            }
            decoded
        });

        let rows = self
            .repository
            .list_page(status, after, PAGE_SIZE as i64 + 1)
            .await?;
        Ok(build_page(rows, PAGE_SIZE, Submission::sort_key))
    }

    async fn sign_thumbs(&self, items: &[Submission]) -> Vec<String> {
        join_all(items.iter().map(|s| {
            self.storage
                .sign(&self.buckets.thumbs, &s.thumb_path, LISTING_URL_TTL)
        }))
        .await
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
    }
}
