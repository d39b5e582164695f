//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCredentialStore`] - File-based credential storage
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses and latency
//! - [`mock::InMemoryCredentialStore`] - In-memory credential storage

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialStore;
pub use mock::{InMemoryCredentialStore, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
