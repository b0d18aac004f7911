use super::dto::{SubmitPhotoRequest, SubmitPhotoResponse};
use crate::{
    domain::{
        shared::errors::DomainError,
        submission::{entity::NewSubmission, repository::SubmissionRepository},
    },
    infrastructure::{
        imaging::normalizer::{self, NormalizedImage},
        security::{
            hashing::hash_with_salt, rate_limiter::RateLimiterGate,
            validation::SubmissionValidator,
        },
        storage::traits::{Buckets, StorageService},
    },
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub const USER_AGENT_MAX_CHARS: usize = 512;

/// Static knobs of the ingestion pipeline, read once from configuration.
#[derive(Debug, Clone)]
pub struct IngestionOptions {
    pub enabled: bool,
    pub ip_hash_salt: String,
    pub fingerprint_hash_salt: String,
    pub buckets: Buckets,
}

/// Guest photo ingestion.
///
/// Stages run strictly in order: validate, rate limit, normalize, store the
/// display variant, store the thumbnail, insert the record. Everything up to
/// and including normalization is side-effect free. After that, a failure
/// removes the objects already written before the error is reported, so a
/// failed submission leaves no object behind and no record ever points at a
/// missing object.
pub struct SubmitPhotoUseCase {
    repository: Arc<dyn SubmissionRepository>,
    storage: Arc<dyn StorageService>,
    gate: Arc<RateLimiterGate>,
    validator: SubmissionValidator,
    options: IngestionOptions,
}

impl SubmitPhotoUseCase {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        storage: Arc<dyn StorageService>,
        gate: Arc<RateLimiterGate>,
        validator: SubmissionValidator,
        options: IngestionOptions,
    ) -> Self {
        Self {
            repository,
            storage,
            gate,
            validator,
            options,
        }
    }

    /// Runs the pipeline and returns the id of the new pending submission.
    ///
    /// # Errors
    /// - `ServiceUnavailable` when submissions are switched off
    /// - `InvalidInput`, `MissingFile`, `PayloadTooLarge`, `UnsupportedMediaType`
    ///   from validation and decoding, before any side effect
    /// - `TooManyRequests` when the submitter's IP is over its window
    /// - `InfrastructureError` for storage or record-store failures, after cleanup
    #[instrument(skip(self, request), fields(
        has_photo = request.fields.photo.is_some(),
        caption_len = request.fields.caption.len()
    ))]
    pub async fn execute(
        &self,
        request: SubmitPhotoRequest,
    ) -> Result<SubmitPhotoResponse, DomainError> {
        if !self.options.enabled {
            return Err(DomainError::ServiceUnavailable(
                "Submissions are currently closed".into(),
            ));
        }

        let validated = self.validator.validate(request.fields)?;

        let ip_hash = hash_with_salt(&request.client_ip, &self.options.ip_hash_salt);
        if !self.gate.admit_submission(&ip_hash).await {
            return Err(DomainError::TooManyRequests);
        }

        let photo = validated.photo;
        let image = tokio::task::spawn_blocking(move || normalizer::normalize(&photo))
            .await
            .map_err(|e| {
                error!("Normalizer task failed: {}", e);
                DomainError::InfrastructureError("Image processing failed".into())
            })?
            .map_err(|e| {
                warn!("Rejecting undecodable upload: {}", e);
                DomainError::from(e)
            })?;

        let id = Uuid::now_v7();
        let new = NewSubmission {
            id,
            caption: validated.caption.into_inner(),
            image_path: format!("uploads/{}.jpg", id),
            thumb_path: format!("thumbs/{}.jpg", id),
            mime: image.mime.to_string(),
            size_bytes: image.display.len() as i64,
            width: image.width as i32,
            height: image.height as i32,
            ip_hash,
            device_id: validated.device_id.value,
            fingerprint_hash: hash_with_salt(
                &validated.fingerprint.value,
                &self.options.fingerprint_hash_salt,
            ),
            user_agent: request.user_agent.chars().take(USER_AGENT_MAX_CHARS).collect(),
        };

        self.store(&new, image).await?;

        if let Err(e) = self.repository.create(&new).await {
            error!("Insert failed for submission {}: {}", id, e);
            self.cleanup(&self.options.buckets.photos, &new.image_path).await;
            self.cleanup(&self.options.buckets.thumbs, &new.thumb_path).await;
            return Err(e);
        }

        info!("Accepted pending submission {}", id);
        Ok(SubmitPhotoResponse { id })
    }

    async fn store(&self, new: &NewSubmission, image: NormalizedImage) -> Result<(), DomainError> {
        let buckets = &self.options.buckets;

        self.storage
            .put(&buckets.photos, &new.image_path, image.display, image.mime)
            .await
            .map_err(|e| {
                error!("Failed to store display image {}: {:#}", new.image_path, e);
                DomainError::InfrastructureError("Failed to store image".into())
            })?;

        if let Err(e) = self
            .storage
            .put(&buckets.thumbs, &new.thumb_path, image.thumbnail, image.mime)
            .await
        {
            error!("Failed to store thumbnail {}: {:#}", new.thumb_path, e);
            self.cleanup(&buckets.photos, &new.image_path).await;
            return Err(DomainError::InfrastructureError(
                "Failed to store thumbnail".into(),
            ));
        }

        debug!("Stored both variants for {}", new.id);
        Ok(())
    }

    /// Best effort: failures are logged and never replace the original error.
    async fn cleanup(&self, bucket: &str, path: &str) {
        if let Err(e) = self.storage.remove(bucket, &[path.to_string()]).await {
            error!("Compensating delete of {}/{} failed: {:#}", bucket, path, e);
        }
    }
}
