use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

const DEFAULT_BUCKET: &str = "test-storage";
const DEFAULT_COVER_BUCKET: &str = "static-storage";
const DEFAULT_PUBLIC_BASE_URL: &str = "https://static.656932.com";
const DEFAULT_MAX_WORKERS: usize = 50;
const DEFAULT_WATERMARK_FILE: &str = "yuanse.png";

const REQUIRED_VARS: [&str; 3] = ["R2_ENDPOINT_URL", "R2_ACCESS_KEY_ID", "R2_SECRET_ACCESS_KEY"];

/// Settings handed to the uploader when it is constructed.
///
/// `max_workers` and `watermark_path` are carried as-is; nothing here checks
/// that the credentials work or that the watermark file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    pub bucket_name: String,
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub max_workers: usize,
    pub watermark_path: PathBuf,
}

/// Where published covers go and how they are addressed publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Bucket passed on every upload call, overriding `UploaderConfig::bucket_name`.
    pub destination_bucket: String,
    pub public_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub uploader: UploaderConfig,
    pub publish: PublishConfig,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let exe_dir = std::env::current_exe()
            .context("resolving executable path")?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_lookup(|name| std::env::var(name).ok(), &exe_dir)
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// * `lookup` - returns the value of a variable, or `None` when unset.
    /// * `exe_dir` - directory a relative watermark path is resolved against.
    pub fn from_lookup<F>(lookup: F, exe_dir: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| lookup(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!(
                "R2 storage not configured, missing: {}. Required environment variables: {}",
                missing.join(", "),
                REQUIRED_VARS.join(", ")
            ));
        }

        let max_workers = match lookup("R2_MAX_WORKERS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("R2_MAX_WORKERS must be a number, got {:?}", raw))?,
            None => DEFAULT_MAX_WORKERS,
        };

        let watermark = lookup("R2_WATERMARK_PATH").unwrap_or_else(|| DEFAULT_WATERMARK_FILE.to_string());

        let uploader = UploaderConfig {
            bucket_name: lookup("R2_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            endpoint_url: lookup("R2_ENDPOINT_URL").unwrap_or_default(),
            access_key_id: lookup("R2_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: lookup("R2_SECRET_ACCESS_KEY").unwrap_or_default(),
            max_workers,
            watermark_path: resolve_watermark_path(&watermark, exe_dir),
        };

        let publish = PublishConfig::from_lookup(&lookup);

        Ok(AppConfig { uploader, publish })
    }
}

impl PublishConfig {
    /// Reads only the publish settings; no storage credentials are needed.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        PublishConfig {
            destination_bucket: lookup("COVER_BUCKET_NAME")
                .unwrap_or_else(|| DEFAULT_COVER_BUCKET.to_string()),
            public_base_url: lookup("R2_PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
        }
    }
}

/// Relative paths are taken relative to `exe_dir`; absolute ones are kept.
pub fn resolve_watermark_path(raw: &str, exe_dir: &Path) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        exe_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("R2_ENDPOINT_URL", "https://account.r2.cloudflarestorage.com"),
            ("R2_ACCESS_KEY_ID", "key-id"),
            ("R2_SECRET_ACCESS_KEY", "secret"),
        ]
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = AppConfig::from_lookup(lookup_from(&required()), Path::new("/opt/app")).unwrap();

        assert_eq!(config.uploader.bucket_name, "test-storage");
        assert_eq!(config.uploader.max_workers, 50);
        assert_eq!(config.uploader.watermark_path, PathBuf::from("/opt/app/yuanse.png"));
        assert_eq!(config.publish.destination_bucket, "static-storage");
        assert_eq!(config.publish.public_base_url, "https://static.656932.com");
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let mut vars = required();
        vars.push(("R2_BUCKET_NAME", "covers-dev"));
        vars.push(("R2_MAX_WORKERS", "8"));
        vars.push(("R2_WATERMARK_PATH", "/srv/marks/logo.png"));
        vars.push(("COVER_BUCKET_NAME", "covers-public"));
        vars.push(("R2_PUBLIC_BASE_URL", "https://cdn.example.com/assets/"));

        let config = AppConfig::from_lookup(lookup_from(&vars), Path::new("/opt/app")).unwrap();

        assert_eq!(config.uploader.endpoint_url, "https://account.r2.cloudflarestorage.com");
        assert_eq!(config.uploader.access_key_id, "key-id");
        assert_eq!(config.uploader.secret_access_key, "secret");
        assert_eq!(config.uploader.bucket_name, "covers-dev");
        assert_eq!(config.uploader.max_workers, 8);
        assert_eq!(config.uploader.watermark_path, PathBuf::from("/srv/marks/logo.png"));
        assert_eq!(config.publish.destination_bucket, "covers-public");
        assert_eq!(config.publish.public_base_url, "https://cdn.example.com/assets/");
    }

    #[test]
    fn missing_credentials_are_all_reported() {
        let err = AppConfig::from_lookup(
            lookup_from(&[("R2_ENDPOINT_URL", "https://example.com")]),
            Path::new("/"),
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("R2_ACCESS_KEY_ID"));
        assert!(err.contains("R2_SECRET_ACCESS_KEY"));
    }

    #[test]
    fn credential_values_are_not_validated() {
        let vars = [
            ("R2_ENDPOINT_URL", "not a url"),
            ("R2_ACCESS_KEY_ID", ""),
            ("R2_SECRET_ACCESS_KEY", ""),
        ];
        let config = AppConfig::from_lookup(lookup_from(&vars), Path::new("/")).unwrap();
        assert_eq!(config.uploader.endpoint_url, "not a url");
        assert!(config.uploader.access_key_id.is_empty());
    }

    #[test]
    fn bad_worker_count_is_an_error() {
        let mut vars = required();
        vars.push(("R2_MAX_WORKERS", "many"));
        assert!(AppConfig::from_lookup(lookup_from(&vars), Path::new("/")).is_err());
    }

    #[test]
    fn publish_settings_load_without_credentials() {
        let publish = PublishConfig::from_lookup(lookup_from(&[]));
        assert_eq!(publish.destination_bucket, "static-storage");
        assert_eq!(publish.public_base_url, "https://static.656932.com");

        let publish = PublishConfig::from_lookup(lookup_from(&[(
            "R2_PUBLIC_BASE_URL",
            "https://cdn.example.com/",
        )]));
        assert_eq!(publish.public_base_url, "https://cdn.example.com/");
    }

    #[test]
    fn relative_watermark_resolves_next_to_executable() {
        assert_eq!(
            resolve_watermark_path("assets/mark.png", Path::new("/usr/local/bin")),
            PathBuf::from("/usr/local/bin/assets/mark.png")
        );
    }
}
