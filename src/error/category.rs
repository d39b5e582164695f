//! Error category classification.
//!
//! Categories let the application shell decide between retrying, sending
//! the user to the sign-in screen, or just showing the message.

use std::fmt;

/// High-level categorization of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout. Generally transient.
    Network,

    /// The session is not (or no longer) authenticated.
    Auth,

    /// Backend errors (HTTP 5xx). Generally transient.
    Server,

    /// The request was refused for a business reason (4xx other than 401).
    Request,

    /// Credential storage on this device failed.
    Storage,

    /// Missing or invalid client configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category can usually be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Request => "request",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Sign in again to continue",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::Request => "Please check your input and try again",
            ErrorCategory::Storage => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Check your configuration settings",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
