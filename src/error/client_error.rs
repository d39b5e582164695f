//! Unified error type for the API client.
//!
//! `ClientError` is what [`crate::client::ApiClient`] returns to the rest of
//! the application.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use crate::config::ConfigError;
use crate::traits::CredentialsError;

/// Unified error type for API calls.
#[derive(Debug)]
pub enum ClientError {
    /// Transport failures and non-2xx responses passed through untouched.
    Network(NetworkError),

    /// Authentication failures and refresh outcomes.
    Auth(AuthError),

    /// The credential store failed outside of a refresh cycle.
    Storage(CredentialsError),

    /// Client configuration is invalid.
    Config(ConfigError),
}

impl ClientError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Network(NetworkError::HttpStatus { status, .. }) => match *status {
                401 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Request,
            },
            ClientError::Network(_) => ErrorCategory::Network,
            ClientError::Auth(AuthError::CredentialStore { .. }) => ErrorCategory::Storage,
            ClientError::Auth(_) => ErrorCategory::Auth,
            ClientError::Storage(_) => ErrorCategory::Storage,
            ClientError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Check if the user has to sign in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            ClientError::Auth(err) => err.requires_reauth(),
            ClientError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            _ => false,
        }
    }

    /// The HTTP status code behind this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Network(err) => err.status(),
            ClientError::Auth(AuthError::Unauthenticated { .. }) => Some(401),
            ClientError::Auth(AuthError::RefreshRejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(err) => err.user_message(),
            ClientError::Auth(err) => err.user_message(),
            ClientError::Storage(_) => {
                "Could not access your saved credentials.".to_string()
            }
            ClientError::Config(err) => format!("Configuration problem: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(err) => err.error_code(),
            ClientError::Auth(err) => err.error_code(),
            ClientError::Storage(_) => "E_STORE",
            ClientError::Config(_) => "E_CONFIG",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(err) => write!(f, "{}", err),
            ClientError::Auth(err) => write!(f, "{}", err),
            ClientError::Storage(err) => write!(f, "{}", err),
            ClientError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Network(err) => Some(err),
            ClientError::Auth(err) => Some(err),
            ClientError::Storage(err) => Some(err),
            ClientError::Config(err) => Some(err),
        }
    }
}

impl From<NetworkError> for ClientError {
    fn from(err: NetworkError) -> Self {
        ClientError::Network(err)
    }
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        ClientError::Auth(err)
    }
}

impl From<CredentialsError> for ClientError {
    fn from(err: CredentialsError) -> Self {
        ClientError::Storage(err)
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        ClientError::Config(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Network(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> ClientError {
        NetworkError::HttpStatus {
            status,
            message: String::new(),
        }
        .into()
    }

    #[test]
    fn test_status_categories() {
        assert_eq!(status(401).category(), ErrorCategory::Auth);
        assert_eq!(status(404).category(), ErrorCategory::Request);
        assert_eq!(status(409).category(), ErrorCategory::Request);
        assert_eq!(status(502).category(), ErrorCategory::Server);
    }

    #[test]
    fn test_auth_categories() {
        let err: ClientError = AuthError::NoCredentialAvailable.into();
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.requires_reauth());

        let err: ClientError = AuthError::CredentialStore {
            message: "locked".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(status(409).status(), Some(409));
        let err: ClientError = AuthError::Unauthenticated {
            url: "/api/auth/login".into(),
            message: String::new(),
        }
        .into();
        assert_eq!(err.status(), Some(401));
        let err: ClientError = AuthError::RefreshCancelled.into();
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_retryable() {
        assert!(status(503).is_retryable());
        assert!(!status(400).is_retryable());
        let err: ClientError = AuthError::RefreshCancelled.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_storage_conversion() {
        let err: ClientError = CredentialsError::SaveFailed("disk full".into()).into();
        assert!(matches!(err, ClientError::Storage(_)));
        assert_eq!(err.error_code(), "E_STORE");
        assert!(err.to_string().contains("disk full"));
    }
}
