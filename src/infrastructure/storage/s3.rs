use crate::config::settings::AppConfig;
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::BehaviorVersion, config::Credentials, config::Region, Client};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {message}", path.display())]
    Body { path: PathBuf, message: String },
    #[error("{0}")]
    Request(String),
}

/// Destination for processed media.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the file at `path` under `key`, tagged with `content_type`.
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
}

impl StorageService {
    pub fn new(config: &AppConfig) -> Self {
        let credentials = Credentials::new(
            &config.s3_access_key,
            &config.s3_secret_key,
            None,
            None,
            "static",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.s3_endpoint {
            // MinIO and other S3-compatible endpoints need path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(
            bucket = %config.s3_bucket,
            endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
            "✅ S3 client configured"
        );

        Self {
            client,
            bucket: config.s3_bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> Result<(), StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Body {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Request(DisplayErrorContext(&e).to_string()))?;

        debug!(bucket = %self.bucket, key, "object stored");
        Ok(())
    }
}
