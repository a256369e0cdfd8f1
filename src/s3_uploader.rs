use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use log::{debug, info};
use std::path::PathBuf;
use std::time::Duration;

use crate::aws::build_s3_client;
use crate::config::UploaderConfig;

/// Anything that can store a blob under a key.
///
/// `bucket` overrides the bucket the implementation was configured with for
/// this call only; `None` means the configured one. `content_type` is stored
/// with the object as given and is not checked against the body.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    async fn upload(
        &self,
        key: &str,
        body: Bytes,
        bucket: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<()>;
}

pub struct S3Uploader {
    client: Client,
    bucket: String,
    max_workers: usize,
    watermark_path: PathBuf,
}

impl S3Uploader {
    /// Creates a new S3Uploader from its configuration.
    ///
    /// Nothing is contacted here; bad credentials show up on the first request.
    pub fn new(config: &UploaderConfig) -> Self {
        let client = build_s3_client(config);

        debug!(
            "S3Uploader ready: bucket={}, max_workers={}, watermark={}",
            config.bucket_name,
            config.max_workers,
            config.watermark_path.display()
        );

        S3Uploader {
            client,
            bucket: config.bucket_name.clone(),
            max_workers: config.max_workers,
            watermark_path: config.watermark_path.clone(),
        }
    }

    /// The bucket configured at construction.
    pub fn default_bucket(&self) -> &str {
        &self.bucket
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn watermark_path(&self) -> &PathBuf {
        &self.watermark_path
    }

    /// Picks the per-call bucket when given, the configured one otherwise.
    pub fn target_bucket<'a>(&'a self, bucket: Option<&'a str>) -> &'a str {
        bucket.unwrap_or(&self.bucket)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns a presigned PUT URL so a client can upload `key` directly.
    ///
    /// * `content_type` - the Content-Type the uploading client must send.
    /// * `expires_in` - how long the URL stays valid.
    pub async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
        bucket: Option<&str>,
    ) -> Result<String> {
        let bucket = self.target_bucket(bucket);
        let presigning = PresigningConfig::expires_in(expires_in)
            .with_context(|| format!("invalid presign expiry {:?}", expires_in))?;

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .with_context(|| format!("presigning upload of {} to bucket {}", key, bucket))?;

        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl ObjectUploader for S3Uploader {
    async fn upload(
        &self,
        key: &str,
        body: Bytes,
        bucket: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let bucket = self.target_bucket(bucket);
        let size = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("uploading {} to bucket {}", key, bucket))?;

        info!("Uploaded {} bytes to {}/{}", size, bucket, key);
        Ok(())
    }
}
