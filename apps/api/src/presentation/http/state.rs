use crate::{
    application::{
        export::ExportUseCase,
        list_submissions::ListSubmissionsUseCase,
        moderation::ModerationUseCase,
        submit_photo::{IngestionOptions, SubmitPhotoUseCase},
    },
    config::Config,
    domain::{settings::repository::SettingsRepository, submission::repository::SubmissionRepository},
    infrastructure::{
        auth::IdentityResolver,
        security::{
            rate_limiter::RateLimiterGate,
            validation::{SubmissionValidator, ValidationConfig},
        },
        storage::traits::StorageService,
    },
};
use std::sync::Arc;

/// Process-wide dependencies, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub storage: Arc<dyn StorageService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub gate: Arc<RateLimiterGate>,
}

impl AppState {
    pub fn submit_photo(&self) -> SubmitPhotoUseCase {
        SubmitPhotoUseCase::new(
            self.submissions.clone(),
            self.storage.clone(),
            self.gate.clone(),
            SubmissionValidator::new(ValidationConfig {
                max_image_size_bytes: self.config.max_upload_bytes,
                ..ValidationConfig::default()
            }),
            IngestionOptions {
                enabled: self.config.submissions_enabled,
                ip_hash_salt: self.config.ip_hash_salt.clone(),
                fingerprint_hash_salt: self.config.fingerprint_hash_salt.clone(),
                buckets: self.config.buckets(),
            },
        )
    }

    pub fn listings(&self) -> ListSubmissionsUseCase {
        ListSubmissionsUseCase::new(
            self.submissions.clone(),
            self.storage.clone(),
            self.config.buckets(),
        )
    }

    pub fn moderation(&self) -> ModerationUseCase {
        ModerationUseCase::new(
            self.submissions.clone(),
            self.settings.clone(),
            self.storage.clone(),
            self.config.buckets(),
        )
    }

    pub fn export(&self) -> ExportUseCase {
        ExportUseCase::new(
            self.submissions.clone(),
            self.storage.clone(),
            self.config.buckets(),
        )
    }
}
