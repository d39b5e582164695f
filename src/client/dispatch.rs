//! Request dispatch with refresh-and-retry on 401.

use super::ApiClient;
use crate::config::EndpointKind;
use crate::error::{AuthError, ClientResult, NetworkError};
use crate::models::RequestDescriptor;
use crate::traits::Response;

impl ApiClient {
    /// Send `request` with the cached access credential attached.
    ///
    /// - 2xx: returned as is.
    /// - 401 from the refresh endpoint: the session is invalidated and
    ///   [`AuthError::RefreshRejected`] is returned.
    /// - 401 from a sign-in endpoint, or on a request that was already
    ///   retried: [`AuthError::Unauthenticated`].
    /// - any other 401: the refresh coordinator obtains a new access
    ///   credential (or joins the refresh already running) and the request is
    ///   sent again exactly once.
    /// - other statuses: [`NetworkError::HttpStatus`] with the response body.
    pub async fn dispatch(&self, request: RequestDescriptor) -> ClientResult<Response> {
        let token = self.inner.cache.get();
        let response = self.send(&request, token.as_deref()).await?;

        if !response.is_unauthorized() {
            return check_status(response);
        }

        let url = self.inner.config.resolve_url(&request.path);
        let message = response.text().unwrap_or_default();

        match self.inner.config.endpoints.classify(&request.path) {
            EndpointKind::Refresh => {
                tracing::warn!("Refresh endpoint answered 401, ending session");
                self.inner.coordinator.invalidate_session();
                return Err(AuthError::RefreshRejected {
                    status: response.status,
                    message,
                }
                .into());
            }
            EndpointKind::Exempt => {
                return Err(AuthError::Unauthenticated { url, message }.into());
            }
            EndpointKind::Protected if request.already_retried => {
                tracing::warn!(
                    "{} {} still unauthorized after refresh",
                    request.method,
                    request.path
                );
                return Err(AuthError::Unauthenticated { url, message }.into());
            }
            EndpointKind::Protected => {}
        }

        tracing::debug!("{} {} unauthorized", request.method, request.path);
        let token = self.inner.coordinator.refresh_or_wait(&request).await?;

        let retry = request.as_retry();
        let response = self.send(&retry, Some(token.as_str())).await?;
        if response.is_unauthorized() {
            tracing::warn!(
                "{} {} still unauthorized after refresh",
                retry.method,
                retry.path
            );
            return Err(AuthError::Unauthenticated {
                url,
                message: response.text().unwrap_or_default(),
            }
            .into());
        }
        check_status(response)
    }

    async fn send(
        &self,
        request: &RequestDescriptor,
        access_token: Option<&str>,
    ) -> ClientResult<Response> {
        let config = &self.inner.config;
        let url = config.resolve_url(&request.path);
        let http_request = request.to_http_request(url.clone(), access_token);

        match tokio::time::timeout(
            config.request_timeout,
            self.inner.http.execute(&http_request),
        )
        .await
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(NetworkError::from_http(e, &url).into()),
            Err(_) => Err(NetworkError::Timeout {
                operation: format!("{} {}", request.method, request.path),
                duration_secs: config.request_timeout.as_secs(),
            }
            .into()),
        }
    }
}

fn check_status(response: Response) -> ClientResult<Response> {
    if response.is_success() {
        return Ok(response);
    }

    Err(NetworkError::HttpStatus {
        status: response.status,
        message: response.text().unwrap_or_default(),
    }
    .into())
}
