//! Network-related error types.
//!
//! This module defines errors that occur while talking to the API,
//! including transport failures and non-2xx responses that are passed
//! through to the caller.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout {
        operation: String,
        duration_secs: u64,
    },

    /// HTTP status error (non-2xx response other than an intercepted 401).
    HttpStatus { status: u16, message: String },

    /// The response body could not be decoded.
    InvalidResponse { message: String },

    /// The request URL could not be built or parsed.
    InvalidUrl { url: String },

    /// Request was cancelled.
    Cancelled,

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// The HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout {
                operation,
                duration_secs,
            } => format!(
                "The {} operation timed out after {} seconds. The server may be slow or unreachable.",
                operation, duration_secs
            ),
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 => "Authentication required. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                409 => "That account already exists.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!(
                    "The server returned an error (HTTP {}). Please try again.",
                    status
                ),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            NetworkError::InvalidUrl { url } => format!("'{}' is not a valid address.", url),
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }

    /// Convert a transport error for the request sent to `url`.
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => NetworkError::Timeout {
                operation: format!("request to {}", url),
                duration_secs: 0,
            },
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(_) => NetworkError::InvalidUrl {
                url: url.to_string(),
            },
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout {
                operation,
                duration_secs,
            } => {
                if *duration_secs > 0 {
                    write!(f, "{} timed out after {} seconds", operation, duration_secs)
                } else {
                    write!(f, "{} timed out", operation)
                }
            }
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::InvalidUrl { url } => write!(f, "Invalid URL: {}", url),
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::InvalidResponse {
            message: err.to_string(),
        }
    }
}
