use anyhow::{Context, Result};
use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};

use crate::cover_key::COVER_KEY_PREFIX;
use crate::public_url::compose_public_url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedCover {
    pub key: String,
    pub url: String,
    pub size: i64,
}

pub struct S3Querier {
    client: Client,
    public_base_url: String,
}

impl S3Querier {
    /// Creates a new S3Querier.
    ///
    /// * `client` - An S3 client, usually shared with the uploader.
    /// * `public_base_url` - Base the listed keys are joined onto.
    pub fn new(client: Client, public_base_url: &str) -> Self {
        S3Querier {
            client,
            public_base_url: public_base_url.to_string(),
        }
    }

    /// Lists every cover stored in `bucket`, following continuation tokens.
    pub async fn list_covers(&self, bucket: &str) -> Result<Vec<PublishedCover>> {
        let mut covers = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(COVER_KEY_PREFIX)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .with_context(|| format!("listing covers in bucket {}", bucket))?;

            for obj in resp.contents() {
                let Some(key) = obj.key() else { continue };
                covers.push(PublishedCover {
                    key: key.to_string(),
                    url: compose_public_url(&self.public_base_url, key)?,
                    size: obj.size().unwrap_or_default(),
                });
            }

            match resp.next_continuation_token() {
                Some(token) if resp.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(covers)
    }
}
