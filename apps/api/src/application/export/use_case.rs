use crate::{
    domain::{
        shared::errors::DomainError,
        submission::{entity::Submission, repository::SubmissionRepository},
    },
    infrastructure::storage::traits::{Buckets, StorageService},
};
use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::{StreamExt, stream};
use std::{sync::Arc, time::Duration};
use tracing::{info, instrument};

/// Lifetime of signed URLs written into an export file.
pub const EXPORT_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub const EXPORT_HEADER: &str =
    "id,status,caption,created_at,approved_at,image_signed_url,thumb_signed_url";

/// Concurrent signing requests while rendering an export.
const SIGN_CONCURRENCY: usize = 16;

/// Full CSV dump of every non-deleted submission, newest first.
pub struct ExportUseCase {
    repository: Arc<dyn SubmissionRepository>,
    storage: Arc<dyn StorageService>,
    buckets: Buckets,
}

impl ExportUseCase {
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
    pub async fn execute(&self) -> Result<String, DomainError> {
        let rows = self.repository.list_for_export().await?;
        let count = rows.len();

        let lines: Vec<String> = stream::iter(rows)
            .map(|s| self.render(s))
            .buffered(SIGN_CONCURRENCY)
            .collect()
            .await;

        info!(rows = count, "Rendered export");
        Ok(std::iter::once(EXPORT_HEADER.to_string())
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn render(&self, s: Submission) -> String {
        let (image_url, thumb_url) = tokio::join!(
            self.storage
                .sign(&self.buckets.photos, &s.image_path, EXPORT_URL_TTL),
            self.storage
                .sign(&self.buckets.thumbs, &s.thumb_path, EXPORT_URL_TTL),
        );
        [
            s.id.to_string(),
            s.status.to_string(),
            s.caption,
            timestamp(s.created_at),
            s.approved_at.map(timestamp).unwrap_or_default(),
            image_url.unwrap_or_default(),
            thumb_url.unwrap_or_default(),
        ]
        .iter()
        .map(|field| escape_csv(field))
        .collect::<Vec<_>>()
        .join(",")
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Quotes a field containing a delimiter, quote or line break, doubling
/// inner quotes.
pub fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
