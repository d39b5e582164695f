use serde::Serialize;

use crate::traits::{Headers, HttpRequest, Method};

/// An application-level request, as handed to [`crate::client::ApiClient::dispatch`].
///
/// The descriptor is never mutated by the dispatcher. A retry after a token
/// refresh is a new descriptor built with [`RequestDescriptor::as_retry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the API base URL, or an absolute URL
    pub path: String,
    pub headers: Headers,
    /// JSON body, already serialized
    pub body: Option<String>,
    /// Set on the one retry issued after a refresh; such a request never
    /// starts another refresh cycle.
    pub already_retried: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
            already_retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Attach a raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The descriptor for the single retry after a refresh.
    pub fn as_retry(&self) -> Self {
        Self {
            already_retried: true,
            ..self.clone()
        }
    }

    /// Build the wire request: resolve the URL and attach the bearer
    /// credential, replacing any `Authorization` header the caller set.
    pub fn to_http_request(&self, url: String, access_token: Option<&str>) -> HttpRequest {
        let mut headers: Headers = self
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        if self.body.is_some() && !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(token) = access_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        HttpRequest {
            method: self.method,
            url,
            headers,
            body: self.body.clone(),
        }
    }
}
