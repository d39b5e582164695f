//! Common test utilities for integration tests.
//!
//! Every test gets its own wiremock server, an in-memory credential store and
//! an [`ApiClient`] over the real reqwest transport pointed at the server.
//!
//! # Example
//!
//! ```ignore
//! let session = TestSession::start().await;
//! mount_protected(&session.server, "/api/flashcards", "T2").await;
//! mount_refresh(&session.server, "R1", "T2", "R2", Duration::ZERO, 1).await;
//! ```

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lingua::adapters::mock::InMemoryCredentialStore;
use lingua::adapters::ReqwestHttpClient;
use lingua::client::ApiClient;
use lingua::config::ClientConfig;
use lingua::traits::CredentialStore;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const REFRESH_KEY: &str = "lingua_refresh_token";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// A client wired to a fresh mock server.
pub struct TestSession {
    pub server: MockServer,
    pub store: InMemoryCredentialStore,
    pub client: ApiClient,
    pub invalidations: Arc<AtomicUsize>,
}

impl TestSession {
    pub async fn start() -> Self {
        Self::start_with_timeout(Duration::from_secs(10)).await
    }

    pub async fn start_with_timeout(timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let store = InMemoryCredentialStore::new();
        let client = client_for(&server, Arc::new(store.clone()), timeout);

        let invalidations = Arc::new(AtomicUsize::new(0));
        let counter = invalidations.clone();
        client.register_session_invalidated_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        Self {
            server,
            store,
            client,
            invalidations,
        }
    }

    /// Seed the stale access credential and the stored refresh credential.
    pub fn with_expired_session(self, access: &str, refresh: &str) -> Self {
        self.client.set_access_token(Some(access.to_string()));
        self.store.insert(REFRESH_KEY, refresh);
        self
    }

    pub fn invalidation_count(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    /// Requests the server received for `request_path`, in arrival order.
    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }
}

pub fn client_for(
    server: &MockServer,
    store: Arc<dyn CredentialStore>,
    timeout: Duration,
) -> ApiClient {
    let http = ReqwestHttpClient::with_timeout(timeout).expect("reqwest client");
    ApiClient::new(
        Arc::new(http),
        store,
        ClientConfig::new()
            .with_base_url(server.uri())
            .with_timeout(timeout),
    )
}

pub fn tokens(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "accessToken": access,
        "refreshToken": refresh,
    }))
}

/// Refresh endpoint that trades `old_refresh` for a new pair, answering
/// after `delay`, and must be called exactly `times` times.
pub async fn mount_refresh(
    server: &MockServer,
    old_refresh: &str,
    access: &str,
    refresh: &str,
    delay: Duration,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(serde_json::json!({ "refreshToken": old_refresh })))
        .respond_with(tokens(access, refresh).set_delay(delay))
        .expect(times)
        .named("token refresh")
        .mount(server)
        .await;
}

/// Refresh endpoint that rejects every refresh credential.
pub async fn mount_refresh_rejected(server: &MockServer, delay: Duration, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("refresh token reused")
                .set_delay(delay),
        )
        .expect(times)
        .named("rejected token refresh")
        .mount(server)
        .await;
}

/// `GET request_path` answers 200 for `Bearer valid_token`, 401 otherwise.
pub async fn mount_protected(server: &MockServer, request_path: &str, valid_token: &str) {
    Mock::given(method("GET"))
        .and(path(request_path))
        .and(header("Authorization", format!("Bearer {}", valid_token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "path": request_path,
        })))
        .with_priority(1)
        .mount(server)
        .await;

    mount_unauthorized(server, request_path).await;
}

/// Every GET under `/api/items/` answers 200 for `Bearer valid_token`, 401 otherwise.
pub async fn mount_protected_items(server: &MockServer, valid_token: &str) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/items/\d+$"))
        .and(header("Authorization", format!("Bearer {}", valid_token).as_str()))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/items/\d+$"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(10)
        .mount(server)
        .await;
}

pub async fn mount_unauthorized(server: &MockServer, request_path: &str) {
    Mock::given(path(request_path))
        .respond_with(ResponseTemplate::new(401).set_body_string("jwt expired"))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Value of the `Authorization` header on a received request.
pub fn bearer(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
