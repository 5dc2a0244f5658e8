//! Kelifax API client.
//!
//! Typed access to the Kelifax catalog API: the paginated public listing,
//! resource details, visitor submissions, logo upload and the admin review
//! calls (bearer session token).
//!
//! # Example
//!
//! ```rust,ignore
//! use kelifax_client::{CategoryFilter, ClientConfig, KelifaxClient, PageRequest};
//!
//! let client = KelifaxClient::new(ClientConfig::from_env()?)?;
//!
//! let page = client
//!     .fetch_resource_page(&PageRequest::new(CategoryFilter::All, 10))
//!     .await?;
//! for resource in &page.resources {
//!     println!("{} ({})", resource.title, resource.category);
//! }
//! ```

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
mod http;
mod resources;
pub mod slug;
pub mod types;
pub mod upload;

pub use auth::{hash_password, AdminAuth, AdminSession, SessionAuth};
pub use config::{ClientConfig, LogoStorageConfig};
pub use credentials::ApiKey;
pub use error::{ClientError, Result};
pub use http::API_KEY_HEADER;
pub use slug::{is_valid_slug, slugify};
pub use types::{
    ActionOutcome, ApiEnvelope, Category, CategoryFilter, LearningResource, PageRequest,
    PageToken, Pagination, Resource, ResourcePage, ResourceStatus, SubmissionData,
    SubmissionDraft, SubmissionPayload, SubmissionReceipt, UnknownCategory,
};
pub use upload::{
    generate_logo_file_name, sniff_content_type, validate_logo, LogoFolder, LogoUpload,
    MAX_LOGO_BYTES,
};

use std::sync::Arc;

use http::HttpClient;

/// Handle to the Kelifax API. Cheap to clone.
#[derive(Clone)]
pub struct KelifaxClient {
    http: HttpClient,
    config: Arc<ClientConfig>,
    auth: Arc<dyn AdminAuth>,
}

impl KelifaxClient {
    /// Build a client. The admin session comes from `config.session_file`
    /// when set, otherwise it lives in memory only.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let auth: Arc<dyn AdminAuth> = match &config.session_file {
            Some(path) => Arc::new(SessionAuth::with_file(path.clone())?),
            None => Arc::new(SessionAuth::in_memory()),
        };
        Self::with_auth(config, auth)
    }

    /// Build a client around a caller-supplied session holder.
    pub fn with_auth(config: ClientConfig, auth: Arc<dyn AdminAuth>) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        tracing::debug!(base_url = %config.base_url, has_api_key = config.has_api_key(), "Kelifax client ready");
        Ok(Self {
            http,
            config: Arc::new(config),
            auth,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

impl std::fmt::Debug for KelifaxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KelifaxClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.auth.is_authenticated())
            .finish()
    }
}
