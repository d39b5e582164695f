//! Mock implementations for testing.
//!
//! These back the trait abstractions without network or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and latency
//! - [`InMemoryCredentialStore`] - In-memory key-value credential storage

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentialStore;
pub use http::{MockHandler, MockHttpClient, MockResponse, RecordedRequest};
