use super::dto::{CaptionUpdated, ModerationOutcome};
use crate::{
    domain::{
        settings::{entity::AppSettings, repository::SettingsRepository},
        shared::errors::DomainError,
        submission::{
            entity::SubmissionStatus, repository::SubmissionRepository, value_objects::Caption,
        },
    },
    infrastructure::storage::traits::{Buckets, StorageService},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Admin moderation: status transitions, caption edits and the settings switch.
///
/// Approve and reject first consult `approvals_enabled`. Reject is a
/// compare-and-set on `pending`; approve is not guarded on the current
/// status. No operation ever touches a deleted row.
pub struct ModerationUseCase {
    repository: Arc<dyn SubmissionRepository>,
    settings: Arc<dyn SettingsRepository>,
    storage: Arc<dyn StorageService>,
    buckets: Buckets,
}

impl ModerationUseCase {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        settings: Arc<dyn SettingsRepository>,
        storage: Arc<dyn StorageService>,
        buckets: Buckets,
    ) -> Self {
        Self {
            repository,
            settings,
            storage,
            buckets,
        }
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: Uuid, admin_id: &str) -> Result<ModerationOutcome, DomainError> {
        self.ensure_approvals_enabled().await?;
        let approved = self
            .repository
            .approve(id, admin_id)
            .await?
            .ok_or_else(not_found)?;
        info!("Submission {} approved by {}", id, admin_id);
        Ok(ModerationOutcome {
            id,
            status: approved.status,
            changed: true,
        })
    }

    /// Rejects only while the row is still `pending`. A lost race is a
    /// no-op that reports the current status.
    #[instrument(skip(self))]
    pub async fn reject(&self, id: Uuid, admin_id: &str) -> Result<ModerationOutcome, DomainError> {
        self.ensure_approvals_enabled().await?;
        if self.repository.reject_if_pending(id, admin_id).await? {
            info!("Submission {} rejected by {}", id, admin_id);
            return Ok(ModerationOutcome {
                id,
                status: SubmissionStatus::Rejected,
                changed: true,
            });
        }

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .filter(|s| !s.status.is_terminal())
            .ok_or_else(not_found)?;
        warn!(
            "Reject of {} ignored, status is already {}",
            id, current.status
        );
        Ok(ModerationOutcome {
            id,
            status: current.status,
            changed: false,
        })
    }

    /// Soft delete, then purge both objects. The status change stands even
    /// when the purge fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, admin_id: &str) -> Result<ModerationOutcome, DomainError> {
        let deleted = self
            .repository
            .mark_deleted(id, admin_id)
            .await?
            .ok_or_else(not_found)?;
        info!("Submission {} deleted by {}", id, admin_id);

        let image_keys = [deleted.image_path.clone()];
        let thumb_keys = [deleted.thumb_path.clone()];
        let (image, thumb) = tokio::join!(
            self.storage.remove(&self.buckets.photos, &image_keys),
            self.storage.remove(&self.buckets.thumbs, &thumb_keys),
        );
        if let Err(e) = image {
            error!("Failed to purge {}: {:#}", deleted.image_path, e);
        }
        if let Err(e) = thumb {
            error!("Failed to purge {}: {:#}", deleted.thumb_path, e);
        }

        Ok(ModerationOutcome {
            id,
            status: SubmissionStatus::Deleted,
            changed: true,
        })
    }

    #[instrument(skip(self, caption))]
    pub async fn edit_caption(&self, id: Uuid, caption: &str) -> Result<CaptionUpdated, DomainError> {
        let caption = Caption::normalize(caption);
        let updated = self
            .repository
            .update_caption(id, caption.as_str())
            .await?
            .ok_or_else(not_found)?;
        Ok(CaptionUpdated {
            id,
            caption: updated.caption,
        })
    }

    pub async fn settings(&self) -> Result<AppSettings, DomainError> {
        self.settings.get().await
    }

    #[instrument(skip(self))]
    pub async fn update_settings(&self, approvals_enabled: bool) -> Result<AppSettings, DomainError> {
        let settings = AppSettings { approvals_enabled };
        self.settings.save(settings).await?;
        Ok(settings)
    }

    async fn ensure_approvals_enabled(&self) -> Result<(), DomainError> {
        if self.settings.get().await?.approvals_enabled {
            Ok(())
        } else {
            Err(DomainError::ServiceUnavailable(
                "Approvals are currently disabled".into(),
            ))
        }
    }
}

fn not_found() -> DomainError {
    DomainError::NotFound("Submission not found".into())
}
