//! Authentication-related error types.
//!
//! This module defines the failures that come out of the token refresh
//! flow and out of requests the server refused to authenticate.

use std::fmt;

use super::network::NetworkError;

/// Authentication-specific error variants.
///
/// `Clone` because a single refresh outcome is fanned out to every request
/// queued behind it.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// The server answered 401 and the request is not eligible for a
    /// refresh-and-retry (credential-issuing endpoint, or already retried).
    Unauthenticated { url: String, message: String },

    /// The server rejected the refresh credential (expired, revoked, reused).
    RefreshRejected { status: u16, message: String },

    /// The refresh call itself failed at the transport level or timed out.
    RefreshFailed { reason: NetworkError },

    /// A refresh was needed but no refresh credential is stored.
    NoCredentialAvailable,

    /// The credential store could not be read or written during a refresh.
    CredentialStore { message: String },

    /// The refresh cycle was abandoned before it settled (logout, or the
    /// task driving it was dropped).
    RefreshCancelled,
}

impl AuthError {
    /// Check if this error means the session is gone and the user must sign in.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthenticated { .. }
                | AuthError::RefreshRejected { .. }
                | AuthError::RefreshFailed { .. }
                | AuthError::NoCredentialAvailable
                | AuthError::CredentialStore { .. }
        )
    }

    /// Check if this error is the outcome of a failed refresh cycle, which
    /// invalidates the session.
    pub fn is_refresh_failure(&self) -> bool {
        matches!(
            self,
            AuthError::RefreshRejected { .. }
                | AuthError::RefreshFailed { .. }
                | AuthError::NoCredentialAvailable
                | AuthError::CredentialStore { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Unauthenticated { .. } => {
                "The server did not accept your credentials.".to_string()
            }
            AuthError::RefreshRejected { .. } => {
                "Your session could not be renewed. Please sign in again.".to_string()
            }
            AuthError::RefreshFailed { .. } => {
                "Failed to renew your session. Please sign in again.".to_string()
            }
            AuthError::NoCredentialAvailable => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::CredentialStore { .. } => {
                "Could not access your saved credentials. Please sign in again.".to_string()
            }
            AuthError::RefreshCancelled => "The session renewal was cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated { .. } => "E_AUTH_UNAUTH",
            AuthError::RefreshRejected { .. } => "E_AUTH_REFRESH_REJ",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH_FAIL",
            AuthError::NoCredentialAvailable => "E_AUTH_NO_CRED",
            AuthError::CredentialStore { .. } => "E_AUTH_STORE",
            AuthError::RefreshCancelled => "E_AUTH_CANCELLED",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated { url, message } => {
                write!(f, "Unauthenticated request to {}: {}", url, message)
            }
            AuthError::RefreshRejected { status, message } => {
                write!(f, "Refresh credential rejected (HTTP {}): {}", status, message)
            }
            AuthError::RefreshFailed { reason } => write!(f, "Token refresh failed: {}", reason),
            AuthError::NoCredentialAvailable => write!(f, "No refresh token available"),
            AuthError::CredentialStore { message } => {
                write!(f, "Credential store error: {}", message)
            }
            AuthError::RefreshCancelled => write!(f, "Token refresh cancelled"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::RefreshFailed { reason } => Some(reason),
            _ => None,
        }
    }
}
