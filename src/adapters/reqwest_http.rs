//! Reqwest-based HTTP client adapter.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use lingua::adapters::ReqwestHttpClient;
/// use lingua::traits::{HttpClient, HttpRequest, Method};
///
/// let client = ReqwestHttpClient::with_timeout(Duration::from_secs(10))?;
/// let request = HttpRequest::new(Method::Get, "http://localhost:8080/api/folders");
/// let response = client.execute(&request).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client whose every request is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::with_client)
            .map_err(|e| HttpError::Other(e.to_string()))
    }

    /// Wrap a preconfigured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        let builder = self
            .client
            .request(Self::convert_method(request.method), &request.url);
        let mut builder = Self::apply_headers(builder, &request.headers);
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        tracing::debug!("{} {} -> {}", request.method, request.url, status);
        Ok(Response::with_headers(status, response_headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn get(url: &str) -> HttpRequest {
        HttpRequest::new(Method::Get, url)
    }

    #[test]
    fn test_with_timeout() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn test_convert_method() {
        assert_eq!(
            ReqwestHttpClient::convert_method(Method::Patch),
            reqwest::Method::PATCH
        );
        assert_eq!(
            ReqwestHttpClient::convert_method(Method::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_execute_sends_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/folders/1"))
            .and(header("Authorization", "Bearer T1"))
            .and(body_string(r#"{"name":"verbs"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let request = HttpRequest::new(Method::Put, format!("{}/api/folders/1", server.uri()))
            .with_header("Authorization", "Bearer T1")
            .with_body(r#"{"name":"verbs"}"#);
        let response = client.execute(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text().unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_non_success_status_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let response = client
            .execute(&get(&format!("{}/api/flashcards", server.uri())))
            .await
            .unwrap();
        assert!(response.is_unauthorized());
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::with_timeout(Duration::from_millis(100)).unwrap();
        let result = client.execute(&get(&server.uri())).await;
        assert!(matches!(result, Err(HttpError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .execute(&get("http://127.0.0.1:59999/test"))
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }
}
