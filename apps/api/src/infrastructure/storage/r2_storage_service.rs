use super::traits::StorageService;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client, config::BehaviorVersion, config::Credentials, config::Region,
    presigning::PresigningConfig, primitives::ByteStream,
};
use std::time::Duration;
use tracing::{debug, warn};

pub struct R2StorageService {
    client: Client,
}

impl R2StorageService {
    pub fn new(
        key: String,
        secret: String,
        endpoint: String,
        region: String,
        force_path_style: bool,
    ) -> Self {
        let creds = Credentials::new(key, secret, None, None, "r2");
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(endpoint)
            .region(Region::new(region))
            .force_path_style(force_path_style)
            .build();
        Self {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl StorageService for R2StorageService {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(path)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control("private, max-age=31536000, immutable")
            .send()
            .await
            .with_context(|| format!("put {}/{} failed", bucket, path))?;
        debug!(bucket, path, size, "Stored object");
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> anyhow::Result<()> {
        for path in paths {
            self.client
                .delete_object()
                .bucket(bucket)
                .key(path)
                .send()
                .await
                .with_context(|| format!("delete {}/{} failed", bucket, path))?;
        }
        Ok(())
    }

    async fn sign(&self, bucket: &str, path: &str, ttl: Duration) -> Option<String> {
        let presigning = match PresigningConfig::expires_in(ttl) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Invalid presigning ttl {:?}: {}", ttl, e);
                return None;
            }
        };

        match self
            .client
            .get_object()
            .bucket(bucket)
            .key(path)
            .presigned(presigning)
            .await
        {
            Ok(request) => Some(request.uri().to_string()),
            Err(e) => {
                warn!("Failed to sign {}/{}: {}", bucket, path, e);
                None
            }
        }
    }
}
