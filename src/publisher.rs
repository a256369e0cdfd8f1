use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::PublishConfig;
use crate::cover_key::{cover_key, COVER_CONTENT_TYPE};
use crate::fetcher::fetch_bytes;
use crate::public_url::compose_public_url;
use crate::s3_uploader::ObjectUploader;

/// Where a video's cover lives, both in the bucket and on the public host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLocation {
    pub video_id: String,
    pub key: String,
    pub url: String,
}

/// Key and public URL for `video_id` under the configured public base.
pub fn locate_cover(config: &PublishConfig, video_id: &str) -> Result<CoverLocation> {
    let key = cover_key(video_id);
    let url = compose_public_url(&config.public_base_url, &key)?;
    debug!("Video {} maps to {}", video_id, key);
    Ok(CoverLocation {
        video_id: video_id.to_string(),
        key,
        url,
    })
}

/// Fetches cover images and stores them under their hashed key.
pub struct CoverPublisher {
    uploader: Arc<dyn ObjectUploader>,
    http: reqwest::Client,
    config: PublishConfig,
}

impl CoverPublisher {
    pub fn new(uploader: Arc<dyn ObjectUploader>, http: reqwest::Client, config: PublishConfig) -> Self {
        CoverPublisher { uploader, http, config }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Key and public URL for `video_id`. No network I/O.
    pub fn locate(&self, video_id: &str) -> Result<CoverLocation> {
        locate_cover(&self.config, video_id)
    }

    /// Fetches `source_url`, uploads it to the destination bucket under the
    /// video's cover key, and returns where it can be reached.
    ///
    /// The first failing step aborts the whole publish.
    pub async fn publish(&self, video_id: &str, source_url: &str) -> Result<CoverLocation> {
        let location = self.locate(video_id)?;
        let body = fetch_bytes(&self.http, source_url).await?;
        self.uploader
            .upload(
                &location.key,
                body,
                Some(&self.config.destination_bucket),
                Some(COVER_CONTENT_TYPE),
            )
            .await?;
        Ok(location)
    }
}
