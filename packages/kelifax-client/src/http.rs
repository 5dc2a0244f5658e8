//! JSON transport shared by every endpoint.
//!
//! Attaches the default header set, turns non-2xx responses into
//! [`ClientError::Api`] and parses the `{success, data, message}` envelope
//! strictly so malformed responses fail here instead of downstream.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::ApiEnvelope;

/// Header carrying the API Gateway key.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = config.api_key.as_ref().filter(|k| !k.is_placeholder()) {
            let mut value = HeaderValue::from_str(key.expose()).map_err(|_| {
                ClientError::Config("API key contains characters not allowed in a header".into())
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send the request and parse the envelope. Non-2xx becomes [`ClientError::Api`].
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<ApiEnvelope<T>> {
        debug!(endpoint, "Kelifax API request");

        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Kelifax API request failed");
            ClientError::from_transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::from_transport)?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            warn!(endpoint, status = status.as_u16(), %message, "Kelifax API error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<ApiEnvelope<T>>(&body).map_err(|e| {
            warn!(endpoint, error = %e, "Malformed Kelifax API response");
            ClientError::Envelope(format!("{}: {}", endpoint, e))
        })
    }
}

impl<T> ApiEnvelope<T> {
    /// Unwrap `data`, failing on `success: false` or a missing payload.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(ClientError::Envelope(
                self.message
                    .unwrap_or_else(|| "API reported an unsuccessful request".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ClientError::Envelope("response is missing `data`".to_string()))
    }
}

/// Pull a human-readable message out of an error body: JSON `message`, else the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"success": false, "message": "Endpoint not found"}"#).as_deref(),
            Some("Endpoint not found")
        );
        assert_eq!(
            error_message("upstream timed out").as_deref(),
            Some("upstream timed out")
        );
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn test_into_data_rejects_unsuccessful_envelope() {
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "success": false,
            "message": "Failed to retrieve existing resources"
        }))
        .unwrap();

        let err = envelope.into_data().unwrap_err();
        assert!(
            matches!(err, ClientError::Envelope(ref m) if m == "Failed to retrieve existing resources")
        );
    }

    #[test]
    fn test_into_data_rejects_missing_data() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(matches!(envelope.into_data(), Err(ClientError::Envelope(_))));
    }

    #[test]
    fn test_envelope_requires_success_flag() {
        let parsed: std::result::Result<ApiEnvelope<serde_json::Value>, _> =
            serde_json::from_value(json!({"data": {}}));
        assert!(parsed.is_err());
    }
}
