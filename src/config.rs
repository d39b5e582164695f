//! Client configuration.
//!
//! [`ClientConfig`] carries the API base URL, the credential-store key for
//! the refresh credential, the network timeout shared by ordinary requests
//! and the refresh call, and the authentication endpoint paths.

use std::time::Duration;

use thiserror::Error;

/// Default API base URL used when `LINGUA_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default credential-store key for the refresh credential.
pub const DEFAULT_REFRESH_TOKEN_KEY: &str = "lingua_refresh_token";

/// Default timeout for every request, the refresh call included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ENV_API_URL: &str = "LINGUA_API_URL";
const ENV_REFRESH_TOKEN_KEY: &str = "LINGUA_REFRESH_TOKEN_KEY";
const ENV_REQUEST_TIMEOUT_SECS: &str = "LINGUA_REQUEST_TIMEOUT_SECS";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Base URL is not an http(s) URL
    #[error("Invalid API base URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),

    /// Timeout is not a positive whole number of seconds
    #[error("Invalid request timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    /// Credential-store key is empty
    #[error("Refresh token key must not be empty")]
    EmptyRefreshTokenKey,
}

/// How the dispatcher treats a 401 from a given endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// The refresh endpoint: a 401 here is always terminal.
    Refresh,
    /// Endpoints used before (or to end) a session: a 401 is returned to the
    /// caller untouched and never starts a refresh.
    Exempt,
    /// Everything else: a 401 starts (or joins) a refresh cycle.
    Protected,
}

/// Paths of the authentication endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEndpoints {
    pub login: String,
    pub register: String,
    pub verify: String,
    pub refresh: String,
    pub logout: String,
    pub google: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            login: "/api/auth/login".to_string(),
            register: "/api/auth/register".to_string(),
            verify: "/api/auth/verify".to_string(),
            refresh: "/api/auth/refresh".to_string(),
            logout: "/api/auth/logout".to_string(),
            google: "/api/auth/google".to_string(),
        }
    }
}

impl AuthEndpoints {
    /// Classify a request URL (absolute or relative) by substring match.
    pub fn classify(&self, url: &str) -> EndpointKind {
        if url.contains(&self.refresh) {
            return EndpointKind::Refresh;
        }

        let exempt = [
            &self.login,
            &self.register,
            &self.verify,
            &self.google,
            &self.logout,
        ];
        if exempt.iter().any(|path| url.contains(path.as_str())) {
            EndpointKind::Exempt
        } else {
            EndpointKind::Protected
        }
    }
}

/// Configuration for [`crate::client::ApiClient`].
///
/// # Example
///
/// ```ignore
/// use lingua::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://api.lingua.example")
///     .with_timeout(std::time::Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Credential-store key holding the refresh credential
    pub refresh_token_key: String,
    /// Timeout for ordinary requests and the refresh call
    pub request_timeout: Duration,
    /// Authentication endpoint paths
    pub endpoints: AuthEndpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            refresh_token_key: DEFAULT_REFRESH_TOKEN_KEY.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            endpoints: AuthEndpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `LINGUA_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        if let Ok(key) = std::env::var(ENV_REFRESH_TOKEN_KEY) {
            config.refresh_token_key = key;
        }
        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the credential-store key for the refresh credential.
    pub fn with_refresh_token_key(mut self, key: impl Into<String>) -> Self {
        self.refresh_token_key = key.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replace the authentication endpoint paths.
    pub fn with_endpoints(mut self, endpoints: AuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.refresh_token_key.is_empty() {
            return Err(ConfigError::EmptyRefreshTokenKey);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        Ok(())
    }

    /// Resolve a request path against the base URL. Absolute URLs are
    /// returned unchanged.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
