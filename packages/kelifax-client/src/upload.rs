//! Logo upload and logo URL construction.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::LogoStorageConfig;
use crate::error::{ClientError, Result};
use crate::slug::slugify;
use crate::types::ResourceStatus;
use crate::KelifaxClient;

/// Largest logo the API accepts.
pub const MAX_LOGO_BYTES: usize = 600 * 1024;

/// The only accepted content type.
pub const LOGO_CONTENT_TYPE: &str = "image/png";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const SUFFIX_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Where an uploaded logo ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoUpload {
    /// Name to store on the submission as `logoImage`.
    pub file_name: String,
    pub key: String,
    pub url: String,
}

/// Which logo folder a resource's image lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFolder {
    Pending,
    Approved,
}

impl LogoFolder {
    /// Awaiting review reads from `pending`; everything else from `approved`.
    pub fn for_status(status: Option<ResourceStatus>) -> Self {
        match status {
            Some(s) if s.is_awaiting_review() => LogoFolder::Pending,
            _ => LogoFolder::Approved,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            LogoFolder::Pending => "pending",
            LogoFolder::Approved => "approved",
        }
    }
}

impl LogoStorageConfig {
    /// Public URL of `file_name`, or `None` when there is no file.
    pub fn logo_url(&self, file_name: &str, folder: LogoFolder) -> Option<String> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return None;
        }

        let path = format!(
            "{}/logos/{}/{}",
            self.environment_prefix,
            folder.as_str(),
            file_name
        );
        Some(match &self.asset_base_url {
            Some(base) => format!("{}/{}", base, path),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, path
            ),
        })
    }
}

/// Reject anything that is not a PNG of at most [`MAX_LOGO_BYTES`].
pub fn validate_logo(content_type: &str, size: usize) -> Result<()> {
    if !content_type.trim().eq_ignore_ascii_case(LOGO_CONTENT_TYPE) {
        return Err(ClientError::Upload("Only PNG files are allowed".into()));
    }
    if size > MAX_LOGO_BYTES {
        return Err(ClientError::Upload(
            "File size must be less than 600KB".into(),
        ));
    }
    Ok(())
}

/// Content type sniffed from the leading bytes. Only PNG is recognized.
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    bytes
        .starts_with(&PNG_SIGNATURE)
        .then_some(LOGO_CONTENT_TYPE)
}

/// `"Amazing Dev Tool"` → `"amazing-dev-tool-a1b2.png"`.
pub fn generate_logo_file_name(resource_name: &str, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        slugify(resource_name),
        random_suffix(),
        extension.trim_start_matches('.')
    )
}

fn random_suffix() -> String {
    uuid::Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(4)
        .map(|b| SUFFIX_CHARS[usize::from(*b) % SUFFIX_CHARS.len()] as char)
        .collect()
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    file_name: &'a str,
    image: String,
}

#[derive(Deserialize)]
struct UploadData {
    #[serde(default)]
    original_filename: Option<String>,
    s3_key: String,
    file_url: String,
}

impl KelifaxClient {
    /// Upload a logo for `resource_name`. Needs an API key.
    pub async fn upload_logo(
        &self,
        resource_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<LogoUpload> {
        validate_logo(content_type, bytes.len())?;
        if !self.config.has_api_key() {
            return Err(ClientError::Config(
                "Logo upload requires KELIFAX_API_KEY".into(),
            ));
        }

        let file_name = generate_logo_file_name(resource_name, "png");
        let body = UploadRequest {
            file_name: &file_name,
            image: BASE64.encode(bytes),
        };
        let request = self.http.request(Method::POST, "/upload-logo").json(&body);

        let data = self
            .http
            .send::<UploadData>(request, "/upload-logo")
            .await
            .and_then(|envelope| envelope.into_data())
            .map_err(|e| {
                error!(file_name = %file_name, error = %e, "Logo upload failed");
                match e {
                    ClientError::Api { message, .. } | ClientError::Envelope(message) => {
                        ClientError::Upload(message)
                    }
                    other => other,
                }
            })?;

        info!(file_name = %file_name, key = %data.s3_key, size = bytes.len(), "Uploaded logo");
        Ok(LogoUpload {
            file_name: data.original_filename.unwrap_or(file_name),
            key: data.s3_key,
            url: data.file_url,
        })
    }
}
