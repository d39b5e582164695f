//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport used by the dispatcher and the refresh call
//! - [`CredentialStore`] - Durable key-value storage for the refresh credential

pub mod credentials;
pub mod http;

pub use credentials::{CredentialStore, CredentialsError};
pub use http::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};
