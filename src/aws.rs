use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use aws_types::region::Region;
use log::debug;

use crate::config::UploaderConfig;

/// R2 ignores the region but SigV4 needs one.
const R2_REGION: &str = "auto";

/// Builds an S3 client for an S3-compatible endpoint with static credentials.
///
/// Path-style addressing is forced so bucket names never end up in the host.
pub fn build_s3_client(config: &UploaderConfig) -> Client {
    debug!(
        "Building S3 client for {} (default bucket {})",
        config.endpoint_url, config.bucket_name
    );

    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "cover-uploader-config",
    );

    let s3_config = aws_sdk_s3::Config::builder()
        .region(Region::new(R2_REGION))
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(&config.endpoint_url)
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();

    Client::from_conf(s3_config)
}
