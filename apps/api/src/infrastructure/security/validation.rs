use crate::domain::{
    shared::errors::DomainError,
    submission::value_objects::{Caption, DeviceId, Fingerprint},
};
use bytes::Bytes;
use tracing::{instrument, warn};

/// Upload ceiling enforced before any decoding.
pub const MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;

/// Content types treated as "not declared"; the decoder decides.
const UNDECLARED_CONTENT_TYPES: &[&str] = &["application/octet-stream"];

/// Configurable limits for guest submissions.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_image_size_bytes: usize,
    /// Allowed `image/<subtype>` subtypes of the declared content type
    pub allowed_image_subtypes: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_image_size_bytes: MAX_UPLOAD_BYTES,
            allowed_image_subtypes: ["jpeg", "jpg", "png", "webp", "heic"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// The uploaded photo part of a multipart submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Raw form fields as received from the client.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub caption: String,
    pub device_id: String,
    pub fingerprint: String,
    pub photo: Option<UploadedFile>,
}

/// Fields that passed validation. The photo is still undecoded.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub caption: Caption,
    pub device_id: DeviceId,
    pub fingerprint: Fingerprint,
    pub photo: Bytes,
}

/// Shape, size and declared-type checks for guest submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.config.max_image_size_bytes
    }

    /// Validates a submission without touching the image bytes.
    ///
    /// # Errors
    /// - `InvalidInput` for a bad `device_id` or `fingerprint`
    /// - `MissingFile` when no (or an empty) photo was sent
    /// - `PayloadTooLarge` above the size ceiling
    /// - `UnsupportedMediaType` when the declared type is outside the allow-list
    #[instrument(skip(self, fields), fields(has_photo = fields.photo.is_some()))]
    pub fn validate(&self, fields: SubmissionFields) -> Result<ValidatedSubmission, DomainError> {
        let device_id = DeviceId::new(fields.device_id)?;
        let fingerprint = Fingerprint::new(fields.fingerprint)?;

        let photo = fields
            .photo
            .filter(|p| !p.bytes.is_empty())
            .ok_or(DomainError::MissingFile)?;

        if photo.bytes.len() > self.config.max_image_size_bytes {
            warn!(
                "Rejecting upload of {} bytes (limit {})",
                photo.bytes.len(),
                self.config.max_image_size_bytes
            );
            return Err(DomainError::PayloadTooLarge(format!(
                "Image too large. Max {} MB.",
                self.config.max_image_size_bytes / (1024 * 1024)
            )));
        }

        if let Some(declared) = photo.content_type.as_deref() {
            if !self.is_allowed_content_type(declared) {
                warn!("Rejecting declared content type {}", declared);
                return Err(DomainError::UnsupportedMediaType(
                    "Unsupported image type. Use JPEG, PNG, WebP or HEIC.".into(),
                ));
            }
        }

        Ok(ValidatedSubmission {
            caption: Caption::normalize(&fields.caption),
            device_id,
            fingerprint,
            photo: photo.bytes,
        })
    }

    fn is_allowed_content_type(&self, declared: &str) -> bool {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if essence.is_empty() || UNDECLARED_CONTENT_TYPES.contains(&essence.as_str()) {
            return true;
        }
        essence
            .strip_prefix("image/")
            .is_some_and(|subtype| self.config.allowed_image_subtypes.iter().any(|a| a == subtype))
    }
}
