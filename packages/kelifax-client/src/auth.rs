//! Admin session handling.
//!
//! One strategy: the administrator logs in with a username and a SHA-256
//! hashed password and receives a bearer session token. The token is kept in
//! memory and, optionally, in a JSON session file so the CLI survives restarts.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::KelifaxClient;

/// Lifetime assumed when the server omits `expiresAt`.
pub const DEFAULT_SESSION_HOURS: i64 = 2;

/// SHA-256 of the password, lowercase hex. This is what `/admin-auth` expects.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// A live admin login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub username: String,
    token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AdminSession {
    pub fn new(
        username: impl Into<String>,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            expires_at,
            role: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("role", &self.role)
            .finish()
    }
}

/// Source of the bearer token attached to admin calls.
pub trait AdminAuth: Send + Sync {
    /// The current session, if one exists and has not expired.
    fn session(&self) -> Option<AdminSession>;

    /// Replace the current session.
    fn store(&self, session: AdminSession) -> Result<()>;

    /// Forget the current session.
    fn logout(&self) -> Result<()>;

    fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Attach `Authorization: Bearer` or fail with [`ClientError::Unauthorized`].
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token().ok_or(ClientError::Unauthorized)?;
        Ok(request.bearer_auth(token))
    }
}

/// In-memory session, optionally mirrored to a JSON file.
#[derive(Debug, Default)]
pub struct SessionAuth {
    current: RwLock<Option<AdminSession>>,
    file: Option<PathBuf>,
}

impl SessionAuth {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load any saved session from `path`. A missing file is not an error;
    /// an expired saved session is discarded.
    pub fn with_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let saved = read_session_file(&path)?.filter(|s| {
            let live = !s.is_expired();
            if !live {
                debug!(path = %path.display(), "Discarding expired admin session");
            }
            live
        });

        Ok(Self {
            current: RwLock::new(saved),
            file: Some(path),
        })
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

impl AdminAuth for SessionAuth {
    fn session(&self) -> Option<AdminSession> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().filter(|s| !s.is_expired()).cloned()
    }

    fn store(&self, session: AdminSession) -> Result<()> {
        if let Some(path) = &self.file {
            write_session_file(path, &session)?;
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.file {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ClientError::SessionStore(format!(
                        "failed to remove {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
        Ok(())
    }
}

fn read_session_file(path: &Path) -> Result<Option<AdminSession>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ClientError::SessionStore(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    match serde_json::from_str(&contents) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            Ok(None)
        }
    }
}

fn write_session_file(path: &Path, session: &AdminSession) -> Result<()> {
    let store_err =
        |e: io::Error| ClientError::SessionStore(format!("failed to write {}: {}", path.display(), e));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(store_err)?;
    }
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| ClientError::SessionStore(e.to_string()))?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(store_err)?;

    // `mode` only applies on creation; tighten a file left by an older run.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(store_err)?;
    }

    file.write_all(json.as_bytes()).map_err(store_err)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    session_token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_role: Option<String>,
}

impl KelifaxClient {
    /// Log in as an administrator and store the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminSession> {
        let body = LoginRequest {
            username,
            password: hash_password(password),
        };
        let request = self.http.request(Method::POST, "/admin-auth").json(&body);

        let envelope = match self.http.send::<LoginData>(request, "/admin-auth").await {
            Ok(envelope) => envelope,
            Err(ClientError::Api { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                return Err(ClientError::Unauthorized)
            }
            Err(e) => return Err(e),
        };
        if !envelope.success {
            return Err(ClientError::Unauthorized);
        }
        let data = envelope.into_data()?;

        let session = AdminSession {
            username: username.to_string(),
            token: data.session_token,
            expires_at: data
                .expires_at
                .unwrap_or_else(|| Utc::now() + Duration::hours(DEFAULT_SESSION_HOURS)),
            role: data.user_role,
        };
        self.auth.store(session.clone())?;

        info!(username, expires_at = %session.expires_at, "Admin logged in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.auth.logout()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn auth(&self) -> &dyn AdminAuth {
        self.auth.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring_in(hours: i64) -> AdminSession {
        AdminSession::new("admin", "tok-123", Utc::now() + Duration::hours(hours))
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let debug = format!("{:?}", session_expiring_in(2));
        assert!(!debug.contains("tok-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_in_memory_session_lifecycle() {
        let auth = SessionAuth::in_memory();
        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());

        auth.store(session_expiring_in(2)).unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.token().as_deref(), Some("tok-123"));

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_expired_session_is_not_authenticated() {
        let auth = SessionAuth::in_memory();
        auth.store(session_expiring_in(-1)).unwrap();
        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());
    }

    #[test]
    fn test_authorize_without_session_is_unauthorized() {
        let auth = SessionAuth::in_memory();
        let request = reqwest::Client::new().get("http://localhost/resources");
        assert!(matches!(
            auth.authorize(request),
            Err(ClientError::Unauthorized)
        ));
    }

    #[test]
    fn test_session_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let auth = SessionAuth::with_file(&path).unwrap();
        assert!(!auth.is_authenticated());
        auth.store(session_expiring_in(2)).unwrap();
        assert!(path.exists());

        let reloaded = SessionAuth::with_file(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("tok-123"));

        reloaded.logout().unwrap();
        assert!(!path.exists());
        // Logging out twice is fine.
        reloaded.logout().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // A file left world-readable by an older run gets tightened too.
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let auth = SessionAuth::with_file(&path).unwrap();
        auth.store(session_expiring_in(2)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(SessionAuth::with_file(&path).unwrap().is_authenticated());

        fs::remove_file(&path).unwrap();
        auth.store(session_expiring_in(2)).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_expired_session_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            serde_json::to_string(&session_expiring_in(-3)).unwrap(),
        )
        .unwrap();

        let auth = SessionAuth::with_file(&path).unwrap();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_garbage_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let auth = SessionAuth::with_file(&path).unwrap();
        assert!(!auth.is_authenticated());
    }
}
