//! Error handling for the API client.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Domain-specific Errors**: Network and Auth errors
//! - **Unified Error Type**: `ClientError` consolidates everything the
//!   dispatcher can return
//! - **Result Type Alias**: `ClientResult<T>`
//!
//! # Taxonomy
//!
//! | Error | Meaning | Session |
//! |-------|---------|---------|
//! | `AuthError::Unauthenticated` | 401 not eligible for refresh | kept |
//! | `AuthError::RefreshRejected` | server refused the refresh credential | invalidated |
//! | `AuthError::RefreshFailed` | transport failure during refresh | invalidated |
//! | `AuthError::NoCredentialAvailable` | nothing to refresh with | invalidated |
//! | `NetworkError::*` | ordinary failures, passed through | kept |

mod auth;
mod category;
mod client_error;
mod network;
mod result;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use client_error::ClientError;
pub use network::NetworkError;
pub use result::ClientResult;
