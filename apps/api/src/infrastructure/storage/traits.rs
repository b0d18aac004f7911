use async_trait::async_trait;
use std::time::Duration;

/// Private object store holding image variants.
///
/// Objects are never publicly readable; access goes through time-limited
/// signed URLs issued per response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()>;

    /// Removes every listed path. Callers treat failures as best effort.
    async fn remove(&self, bucket: &str, paths: &[String]) -> anyhow::Result<()>;

    /// Signed read URL, or `None` when signing fails.
    async fn sign(&self, bucket: &str, path: &str, ttl: Duration) -> Option<String>;
}

/// Bucket names for the two image variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub photos: String,
    pub thumbs: String,
}
