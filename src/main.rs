mod api;
mod aws;
mod config;
mod cover_key;
mod fetcher;
mod public_url;
mod publisher;
mod s3_querier;
mod s3_uploader;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, PublishConfig};
use crate::publisher::{locate_cover, CoverPublisher};
use crate::s3_querier::S3Querier;
use crate::s3_uploader::S3Uploader;

#[derive(Parser)]
#[command(name = "cover_uploader", about = "Publish video cover images to S3-compatible storage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch an image and publish it as a video's cover, printing its public URL
    Publish {
        #[arg(long)]
        video_id: String,
        #[arg(long)]
        source_url: String,
    },
    /// Print the storage key and public URL of a video's cover
    Key {
        #[arg(long)]
        video_id: String,
    },
    /// Print a presigned PUT URL for a direct upload
    Presign {
        #[arg(long)]
        key: String,
        #[arg(long, default_value = "image/jpeg")]
        content_type: String,
        /// Validity in seconds
        #[arg(long, default_value_t = 3600)]
        expires_in: u64,
        /// Defaults to the configured bucket
        #[arg(long)]
        bucket: Option<String>,
    },
    /// List published covers
    List {
        /// Defaults to the cover destination bucket
        #[arg(long)]
        bucket: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Pure key derivation needs no storage credentials.
    if let Command::Key { video_id } = &cli.command {
        let location = locate_cover(&PublishConfig::from_env(), video_id)?;
        println!("{}\n{}", location.key, location.url);
        return Ok(());
    }

    let config = AppConfig::from_env()?;

    let uploader = Arc::new(S3Uploader::new(&config.uploader));
    info!(
        "Uploader configured for bucket {} ({} workers, watermark {})",
        uploader.default_bucket(),
        uploader.max_workers(),
        uploader.watermark_path().display()
    );
    let querier = S3Querier::new(uploader.client().clone(), &config.publish.public_base_url);
    let publisher = CoverPublisher::new(uploader.clone(), reqwest::Client::new(), config.publish.clone());

    match cli.command {
        Command::Publish { video_id, source_url } => {
            let location = publisher.publish(&video_id, &source_url).await?;
            println!("{}", location.url);
        }
        Command::Key { .. } => unreachable!("handled before storage setup"),
        Command::Presign {
            key,
            content_type,
            expires_in,
            bucket,
        } => {
            let url = uploader
                .presigned_put_url(&key, &content_type, Duration::from_secs(expires_in), bucket.as_deref())
                .await?;
            println!("{}", url);
        }
        Command::List { bucket } => {
            let bucket = bucket.unwrap_or_else(|| config.publish.destination_bucket.clone());
            for cover in querier.list_covers(&bucket).await? {
                println!("{}\t{}\t{}", cover.key, cover.size, cover.url);
            }
        }
        Command::Serve { port } => {
            info!("Serving cover API on port {}", port);
            api::run_api_server(publisher, querier, port).await?;
        }
    }

    Ok(())
}
