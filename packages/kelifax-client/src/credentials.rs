//! The API Gateway key, kept out of logs.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};

/// Values shipped in `.env.example` that mean "not configured".
const PLACEHOLDERS: &[&str] = &["your_api_key_here", "your_api_url_here", "changeme"];

/// True for blank values and template placeholders.
pub(crate) fn is_placeholder_value(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || PLACEHOLDERS.contains(&value)
}

/// `X-Api-Key` value. Debug and Display print `[REDACTED]`.
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretBox::new(key.into().into_boxed_str()))
    }

    /// Only for building the request header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// A placeholder key is never sent.
    pub fn is_placeholder(&self) -> bool {
        is_placeholder_value(self.expose())
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_redacted() {
        let key = ApiKey::new("C50mHXZdBz2JCCArz");
        assert_eq!(format!("{:?}", key), "ApiKey([REDACTED])");
        assert_eq!(key.to_string(), "[REDACTED]");
        assert_eq!(key.clone().expose(), "C50mHXZdBz2JCCArz");
    }

    #[test]
    fn test_placeholders() {
        assert!(ApiKey::new("your_api_key_here").is_placeholder());
        assert!(ApiKey::new("  ").is_placeholder());
        assert!(!ApiKey::new("real-key").is_placeholder());
        assert!(is_placeholder_value("your_api_url_here"));
    }
}
