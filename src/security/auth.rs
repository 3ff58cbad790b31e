//! API key authentication for chat gateways.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

/// Paths reachable without a key.
const OPEN_PATHS: &[&str] = &["/health"];

/// How gateways present their key.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Header carrying the key.
    pub header_name: String,
    /// Scheme word before the key, e.g. `Bearer`.
    pub scheme: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header_name: AUTHORIZATION.to_string(),
            scheme: "Bearer".to_string(),
        }
    }
}

impl AuthConfig {
    /// Open access, for local development.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// The keys accepted by this server. Fixed at startup.
#[derive(Debug, Clone)]
pub struct ApiKeyStore {
    config: AuthConfig,
    keys: HashSet<String>,
}

impl ApiKeyStore {
    pub fn with_keys<I, K>(config: AuthConfig, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            config,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn disabled() -> Self {
        Self::with_keys(AuthConfig::disabled(), Vec::<String>::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }

    /// Pull the key out of a header value such as `Bearer ww_abc`.
    pub fn extract_key(&self, header_value: &str) -> Option<String> {
        let (scheme, key) = header_value.trim().split_once(' ')?;
        let key = key.trim();
        (scheme.eq_ignore_ascii_case(&self.config.scheme) && !key.is_empty())
            .then(|| key.to_string())
    }

    /// Whether a request with these headers may proceed.
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        if !self.config.enabled {
            return true;
        }
        headers
            .get(self.config.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .and_then(|v| self.extract_key(v))
            .is_some_and(|key| self.is_valid(&key))
    }
}

/// Reject requests without a valid key with `401 Unauthorized`.
pub async fn auth_middleware(
    State(store): State<Arc<ApiKeyStore>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = request.uri().path();
    if OPEN_PATHS.contains(&path) || store.authorize(request.headers()) {
        return Ok(next.run(request).await);
    }

    tracing::debug!(path, "rejected unauthenticated request");
    Err(StatusCode::UNAUTHORIZED)
}

/// Make up a key for a server started with auth on but no keys configured.
pub fn generate_api_key() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mixed = nanos
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .rotate_left(17)
        ^ u64::from(std::process::id());

    format!("ww_{:x}_{:016x}", nanos, mixed)
}
