//! Mock HTTP client for testing.
//!
//! Responses come from, in order: a handler closure, a per-URL table (exact
//! match, then prefix), and a default. Latency can be injected per URL prefix
//! so tests can hold a refresh call open while other requests fail.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(Response),
    Error(HttpError),
}

impl MockResponse {
    /// Shorthand for a response with a status and an empty body.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, Default::default()))
    }

    /// Shorthand for a JSON response.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        MockResponse::Success(Response::json_body(status, value))
    }
}

/// Computes a response from the request; takes priority over the URL table.
pub type MockHandler = Arc<dyn Fn(&HttpRequest) -> MockResponse + Send + Sync>;

/// Mock HTTP client for testing.
///
/// Cloning yields another handle onto the same configuration and request log.
///
/// # Example
///
/// ```ignore
/// use lingua::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_handler(|request| match request.header("Authorization") {
///     Some("Bearer T2") => MockResponse::status(200),
///     _ => MockResponse::status(401),
/// });
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    handler: Arc<Mutex<Option<MockHandler>>>,
    latency: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("responses", &self.responses.lock().map(|r| r.len()).unwrap_or(0))
            .field("requests", &self.requests.lock().map(|r| r.len()).unwrap_or(0))
            .finish()
    }
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            handler: Arc::new(Mutex::new(None)),
            latency: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a URL. Exact matches win over prefix matches.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Answer every request through `handler`, bypassing the URL table.
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(&HttpRequest) -> MockResponse + Send + Sync + 'static,
    {
        *self.handler.lock().unwrap() = Some(Arc::new(handler));
    }

    /// Delay every request whose URL starts with `url_prefix`.
    pub fn set_latency(&self, url_prefix: &str, delay: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(url_prefix.to_string(), delay);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Count recorded requests to exactly `url`.
    pub fn requests_to(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.url == url)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
    }

    fn record_request(&self, request: &HttpRequest) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });
    }

    fn latency_for(&self, url: &str) -> Option<Duration> {
        self.latency
            .lock()
            .unwrap()
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, delay)| *delay)
    }

    fn get_response(&self, request: &HttpRequest) -> Option<MockResponse> {
        let handler = self.handler.lock().unwrap().clone();
        if let Some(handler) = handler {
            return Some(handler(request));
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(&request.url) {
            return Some(response.clone());
        }

        if let Some((_, response)) = responses
            .iter()
            .filter(|(pattern, _)| request.url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
        {
            return Some(response.clone());
        }

        self.default_response.lock().unwrap().clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        self.record_request(request);

        if let Some(delay) = self.latency_for(&request.url) {
            tokio::time::sleep(delay).await;
        }

        match self.get_response(request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}
