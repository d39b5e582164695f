//! Authenticated API client.
//!
//! [`ApiClient`] is the request dispatcher the rest of the application talks
//! to. It attaches the cached access credential to every request, hands
//! 401s to the [`RefreshCoordinator`], and retries each request at most once
//! after a refresh. The account operations (login, logout, session restore)
//! live on the same type in [`auth`].

mod auth;
mod dispatch;

pub use auth::SessionSnapshot;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::{FileCredentialStore, ReqwestHttpClient};
use crate::auth::{RefreshCoordinator, SessionEvent, SessionNotifier, TokenCache};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, NetworkError};
use crate::models::RequestDescriptor;
use crate::traits::{CredentialStore, HttpClient, Response};

struct Inner {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    cache: TokenCache,
    notifier: SessionNotifier,
    coordinator: RefreshCoordinator,
    config: ClientConfig,
}

/// Cheaply cloneable handle; every clone shares the same session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("authenticated", &self.inner.cache.is_set())
            .field("coordinator", &self.inner.coordinator)
            .finish()
    }
}

impl ApiClient {
    /// Build a client over the given transport and credential store.
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        config: ClientConfig,
    ) -> Self {
        let cache = TokenCache::new();
        let notifier = SessionNotifier::new();
        let coordinator = RefreshCoordinator::new(
            http.clone(),
            store.clone(),
            cache.clone(),
            notifier.clone(),
            &config,
        );

        Self {
            inner: Arc::new(Inner {
                http,
                store,
                cache,
                notifier,
                coordinator,
                config,
            }),
        }
    }

    /// Production wiring: reqwest transport bounded by the configured
    /// timeout and the refresh credential kept in `~/.lingua`.
    pub fn with_defaults(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)
            .map_err(|e| NetworkError::from_http(e, &config.base_url))?;
        let store = FileCredentialStore::new()?;
        Ok(Self::new(Arc::new(http), Arc::new(store), config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    /// Overwrite the cached access credential. `None` clears it.
    pub fn set_access_token(&self, token: Option<String>) {
        self.inner.cache.set(token);
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.cache.get()
    }

    /// Register a callback invoked with `{authenticated: false}` when a
    /// refresh fails and the session cannot be recovered.
    pub fn register_session_invalidated_callback<F>(&self, callback: F)
    where
        F: Fn(SessionEvent) + Send + Sync + 'static,
    {
        self.inner.notifier.register(move |event| {
            if !event.authenticated {
                callback(event);
            }
        });
    }

    /// Register a listener for every session change: `{authenticated: true}`
    /// after a sign-in or restore, `{authenticated: false}` on invalidation.
    pub fn register_session_listener<F>(&self, callback: F)
    where
        F: Fn(SessionEvent) + Send + Sync + 'static,
    {
        self.inner.notifier.register(callback);
    }

    pub async fn get(&self, path: &str) -> ClientResult<Response> {
        self.dispatch(RequestDescriptor::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Response> {
        self.dispatch(RequestDescriptor::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Response> {
        self.dispatch(RequestDescriptor::put(path).json(body)?).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Response> {
        self.dispatch(RequestDescriptor::patch(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Response> {
        self.dispatch(RequestDescriptor::delete(path)).await
    }

    /// GET and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        decode(self.get(path).await?)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.post(path, body).await?)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    response.json().map_err(ClientError::from)
}
