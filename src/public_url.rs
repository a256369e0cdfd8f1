use anyhow::{Context, Result};
use url::Url;

/// Resolves `key` against `base_url` the way a browser resolves a relative link.
///
/// This is not string concatenation: a key starting with `/` replaces the
/// base path, and the last base segment is dropped unless the base ends in `/`.
pub fn compose_public_url(base_url: &str, key: &str) -> Result<String> {
    let base = Url::parse(base_url).with_context(|| format!("invalid public base URL {:?}", base_url))?;
    let joined = base
        .join(key)
        .with_context(|| format!("cannot join {:?} onto {}", key, base))?;
    Ok(joined.to_string())
}
