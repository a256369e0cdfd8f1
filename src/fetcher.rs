use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, warn};

/// Downloads `url` in one GET and returns the whole body.
///
/// The status code is not checked: a non-2xx response is logged and its body
/// is returned like any other. Bad URLs and transport failures are errors.
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Bytes> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetching cover from {:?}", url))?;

    let status = response.status();
    if !status.is_success() {
        warn!("GET {} answered {}, using body anyway", url, status);
    }

    let body = response
        .bytes()
        .await
        .with_context(|| format!("reading response body from {}", url))?;

    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}
