//! Client configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::{is_placeholder_value, ApiKey};
use crate::error::{ClientError, Result};

/// API Gateway stage used when `KELIFAX_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://ds7z6al08j.execute-api.us-east-1.amazonaws.com/dev";

/// Transport timeout applied to every request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resources requested per page when the caller does not say otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Where approved and pending logos live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoStorageConfig {
    pub bucket: String,
    pub region: String,
    /// Environment prefix (`dev`, `prod`) prepended to every object key.
    pub environment_prefix: String,
    /// CloudFront or custom domain in front of the bucket.
    pub asset_base_url: Option<String>,
}

impl Default for LogoStorageConfig {
    fn default() -> Self {
        Self {
            bucket: "kelifax-resources".to_string(),
            region: "us-east-1".to_string(),
            environment_prefix: "dev".to_string(),
            asset_base_url: None,
        }
    }
}

/// Kelifax client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<ApiKey>,
    /// When false, the feed reads the bundled catalog instead of the API.
    pub use_api: bool,
    pub timeout: Duration,
    pub batch_size: usize,
    pub logo_storage: LogoStorageConfig,
    /// Where the admin session is persisted between runs.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a config pointing at `base_url` with defaults for everything else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_key: None,
            use_api: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            logo_storage: LogoStorageConfig::default(),
            session_file: None,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key-value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("KELIFAX_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if is_placeholder_value(&base_url) {
            return Err(ClientError::Config(
                "KELIFAX_API_URL is still a placeholder".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| {
            ClientError::Config(format!("KELIFAX_API_URL must be an absolute URL: {}", e))
        })?;

        let use_api = match get("KELIFAX_USE_API") {
            Some(v) => parse_flag(&v).ok_or_else(|| {
                ClientError::Config("KELIFAX_USE_API must be true or false".into())
            })?,
            None => true,
        };

        let timeout_secs = match get("KELIFAX_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| {
                ClientError::Config("KELIFAX_TIMEOUT_SECS must be a valid number".into())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let batch_size = match get("KELIFAX_BATCH_SIZE") {
            Some(v) => v.trim().parse::<usize>().map_err(|_| {
                ClientError::Config("KELIFAX_BATCH_SIZE must be a valid number".into())
            })?,
            None => DEFAULT_BATCH_SIZE,
        };

        let defaults = LogoStorageConfig::default();
        let logo_storage = LogoStorageConfig {
            bucket: get("KELIFAX_S3_BUCKET").unwrap_or(defaults.bucket),
            region: get("KELIFAX_S3_REGION").unwrap_or(defaults.region),
            environment_prefix: get("KELIFAX_S3_PREFIX").unwrap_or(defaults.environment_prefix),
            asset_base_url: get("KELIFAX_ASSET_BASE_URL").map(|u| normalize_base_url(&u)),
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            api_key: get("KELIFAX_API_KEY").map(ApiKey::new),
            use_api,
            timeout: Duration::from_secs(timeout_secs),
            batch_size,
            logo_storage,
            session_file: get("KELIFAX_SESSION_FILE").map(PathBuf::from),
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(key));
        self
    }

    pub fn with_use_api(mut self, use_api: bool) -> Self {
        self.use_api = use_api;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// True when an API key is present and is not a template placeholder.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .map(|k| !k.is_placeholder())
            .unwrap_or(false)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert!(config.use_api);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.logo_storage, LogoStorageConfig::default());
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KELIFAX_API_URL", "https://api.example.com/prod/"),
            ("KELIFAX_API_KEY", "abc123"),
            ("KELIFAX_USE_API", "false"),
            ("KELIFAX_TIMEOUT_SECS", "30"),
            ("KELIFAX_BATCH_SIZE", "25"),
            ("KELIFAX_S3_BUCKET", "assets"),
            ("KELIFAX_S3_PREFIX", "prod"),
            ("KELIFAX_ASSET_BASE_URL", "https://cdn.example.com/"),
            ("KELIFAX_SESSION_FILE", "/tmp/kelifax.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/prod");
        assert_eq!(config.api_key.as_ref().unwrap().expose(), "abc123");
        assert!(!config.use_api);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.logo_storage.bucket, "assets");
        assert_eq!(config.logo_storage.environment_prefix, "prod");
        assert_eq!(
            config.logo_storage.asset_base_url.as_deref(),
            Some("https://cdn.example.com")
        );
        assert_eq!(
            config.session_file.as_deref(),
            Some(std::path::Path::new("/tmp/kelifax.json"))
        );
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = ClientConfig::from_lookup(lookup(&[("KELIFAX_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_rejects_relative_and_placeholder_urls() {
        assert!(ClientConfig::from_lookup(lookup(&[("KELIFAX_API_URL", "/dev")])).is_err());
        assert!(
            ClientConfig::from_lookup(lookup(&[("KELIFAX_API_URL", "your_api_url_here")]))
                .is_err()
        );
    }

    #[test]
    fn test_placeholder_key_is_not_a_key() {
        let config =
            ClientConfig::from_lookup(lookup(&[("KELIFAX_API_KEY", "your_api_key_here")]))
                .unwrap();
        assert!(!config.has_api_key());
        assert!(ClientConfig::new("http://localhost").with_api_key("k").has_api_key());
    }
}
