//! Refresh coordinator.
//!
//! Serializes access-token refreshes so that at most one refresh call is in
//! flight, parks every request that hits a 401 while that call is running,
//! and releases all of them together when it settles.
//!
//! State machine:
//!
//! ```text
//!            401, idle                      refresh settled
//!   Idle ─────────────────▶ Refreshing ─────────────────────▶ Idle
//!                             │    ▲        (queue drained first)
//!                  401 while  │    │
//!                  refreshing └────┘ enqueue PendingRequest
//! ```
//!
//! The state lives behind a `std::sync::Mutex` that is never held across an
//! `.await`; the check of `is_refreshing` and the enqueue happen under one
//! lock acquisition.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;

use super::session::SessionNotifier;
use super::token_cache::TokenCache;
use crate::config::ClientConfig;
use crate::error::{AuthError, NetworkError};
use crate::models::{RefreshRequest, RequestDescriptor, TokenPair};
use crate::traits::{CredentialStore, HttpClient, HttpRequest, Method};

type Settlement = Result<String, AuthError>;

/// A request parked until the in-flight refresh settles.
///
/// `resolve` and `reject` consume the entry, so each one settles exactly once.
#[derive(Debug)]
pub struct PendingRequest {
    request: Option<RequestDescriptor>,
    settle: oneshot::Sender<Settlement>,
}

impl PendingRequest {
    /// The request that was parked, if the wait came from a dispatch.
    pub fn request(&self) -> Option<&RequestDescriptor> {
        self.request.as_ref()
    }

    fn resolve(self, access_token: String) {
        // The waiter may have been dropped; nothing to deliver then.
        let _ = self.settle.send(Ok(access_token));
    }

    fn reject(self, error: AuthError) {
        let _ = self.settle.send(Err(error));
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    is_refreshing: bool,
    /// Non-empty only while `is_refreshing`; FIFO by arrival.
    queue: Vec<PendingRequest>,
    /// Bumped by `reset` so a cycle that outlives a logout cannot write back.
    generation: u64,
    /// Logouts in progress; no cycle may start while non-zero.
    signing_out: usize,
}

impl RefreshState {
    fn supersede(&mut self) {
        self.generation += 1;
        let queue = std::mem::take(&mut self.queue);
        if !queue.is_empty() {
            tracing::debug!("Reset rejecting {} queued request(s)", queue.len());
        }
        for pending in queue {
            pending.reject(AuthError::RefreshCancelled);
        }
        self.is_refreshing = false;
    }
}

enum Role {
    Leader(u64),
    Follower(oneshot::Receiver<Settlement>),
}

/// Owns the refresh state for one application session.
pub struct RefreshCoordinator {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    cache: TokenCache,
    notifier: SessionNotifier,
    refresh_url: String,
    refresh_token_key: String,
    timeout: Duration,
    state: Mutex<RefreshState>,
    refresh_calls: AtomicUsize,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.refresh_url)
            .field("is_refreshing", &self.is_refreshing())
            .field("queued", &self.queued())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        cache: TokenCache,
        notifier: SessionNotifier,
        config: &ClientConfig,
    ) -> Self {
        Self {
            http,
            store,
            cache,
            notifier,
            refresh_url: config.resolve_url(&config.endpoints.refresh),
            refresh_token_key: config.refresh_token_key.clone(),
            timeout: config.request_timeout,
            state: Mutex::new(RefreshState::default()),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Called after `request` got a 401. Either runs the refresh (no cycle in
    /// flight) or waits for the running one, and yields the new access token.
    pub async fn refresh_or_wait(&self, request: &RequestDescriptor) -> Result<String, AuthError> {
        self.join_cycle(Some(request.clone())).await
    }

    /// Obtain a new access token without an originating request (cold-start
    /// session restore). Joins a running cycle if there is one.
    pub async fn refresh_now(&self) -> Result<String, AuthError> {
        self.join_cycle(None).await
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock_state().is_refreshing
    }

    /// Number of requests parked behind the in-flight refresh.
    pub fn queued(&self) -> usize {
        self.lock_state().queue.len()
    }

    /// Snapshot of the parked requests in arrival order.
    pub fn queued_requests(&self) -> Vec<RequestDescriptor> {
        self.lock_state()
            .queue
            .iter()
            .filter_map(|pending| pending.request().cloned())
            .collect()
    }

    /// Number of refresh cycles started since creation.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Clear the access token and tell the shell the session is gone.
    pub fn invalidate_session(&self) {
        self.cache.clear();
        self.notifier.invalidate();
    }

    /// Return to Idle on logout. Parked requests are rejected with
    /// [`AuthError::RefreshCancelled`]; a refresh still in flight finishes
    /// without touching the token cache or the credential store.
    pub fn reset(&self) {
        self.lock_state().supersede();
    }

    /// Start tearing down the session. Like [`reset`](Self::reset), and the
    /// cached access token is dropped in the same step. Until the returned
    /// guard is dropped every 401 fails with [`AuthError::RefreshCancelled`]
    /// instead of starting a cycle that could read the refresh credential
    /// before it is deleted.
    pub fn begin_sign_out(&self) -> SignOutGuard<'_> {
        let mut state = self.lock_state();
        state.supersede();
        state.signing_out += 1;
        self.cache.clear();
        SignOutGuard { coordinator: self }
    }

    /// Whether a logout is tearing down the session.
    pub fn is_signing_out(&self) -> bool {
        self.lock_state().signing_out > 0
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock_state().generation == generation
    }

    async fn join_cycle(&self, request: Option<RequestDescriptor>) -> Result<String, AuthError> {
        let role = {
            let mut state = self.lock_state();
            if state.signing_out > 0 {
                tracing::debug!("Logout in progress, not refreshing");
                return Err(AuthError::RefreshCancelled);
            }
            if state.is_refreshing {
                let (settle, receiver) = oneshot::channel();
                if let Some(ref request) = request {
                    tracing::debug!(
                        "Refresh in flight, queueing {} {}",
                        request.method,
                        request.path
                    );
                }
                state.queue.push(PendingRequest { request, settle });
                Role::Follower(receiver)
            } else {
                state.is_refreshing = true;
                Role::Leader(state.generation)
            }
        };

        match role {
            Role::Follower(receiver) => receiver.await.unwrap_or(Err(AuthError::RefreshCancelled)),
            Role::Leader(generation) => self.lead_cycle(generation).await,
        }
    }

    async fn lead_cycle(&self, generation: u64) -> Result<String, AuthError> {
        let mut guard = CycleGuard::new(self, generation);
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Access token rejected, refreshing session");

        match self.refresh_tokens(generation).await {
            Ok(access_token) => {
                guard.disarm();
                let released = self.finish_cycle(generation, Ok(access_token.clone()));
                match released {
                    Some(count) => {
                        tracing::info!("Session refreshed, releasing {} queued request(s)", count);
                        Ok(access_token)
                    }
                    None => Err(AuthError::RefreshCancelled),
                }
            }
            Err(err) => {
                guard.fail_with(err.clone());
                if self.is_current(generation) && err.is_refresh_failure() {
                    tracing::warn!("Session refresh failed: {}", err);
                    self.cache.clear();
                    if let Err(e) = self.store.delete(&self.refresh_token_key).await {
                        tracing::warn!("Failed to delete refresh token: {}", e);
                    }
                    self.notifier.invalidate();
                }
                guard.disarm();
                self.finish_cycle(generation, Err(err.clone()));
                Err(err)
            }
        }
    }

    /// Drain the queue with `outcome` and return to Idle. Returns the number of
    /// released requests, or `None` if the cycle was superseded by `reset`.
    fn finish_cycle(&self, generation: u64, outcome: Settlement) -> Option<usize> {
        let mut state = self.lock_state();
        if state.generation != generation {
            return None;
        }

        let queue = std::mem::take(&mut state.queue);
        let count = queue.len();
        for pending in queue {
            match &outcome {
                Ok(token) => pending.resolve(token.clone()),
                Err(err) => pending.reject(err.clone()),
            }
        }
        state.is_refreshing = false;
        Some(count)
    }

    async fn refresh_tokens(&self, generation: u64) -> Result<String, AuthError> {
        let refresh_token = self
            .store
            .get(&self.refresh_token_key)
            .await
            .map_err(|e| AuthError::CredentialStore {
                message: e.to_string(),
            })?
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::NoCredentialAvailable)?;

        let pair = self.call_refresh_endpoint(&refresh_token).await?;

        {
            let state = self.lock_state();
            if state.generation != generation {
                return Err(AuthError::RefreshCancelled);
            }
            self.cache.set(Some(pair.access_token.clone()));
        }

        if let Some(ref rotated) = pair.refresh_token {
            self.store
                .set(&self.refresh_token_key, rotated)
                .await
                .map_err(|e| AuthError::CredentialStore {
                    message: e.to_string(),
                })?;
        }

        if !self.is_current(generation) {
            self.discard_superseded(&pair).await;
            return Err(AuthError::RefreshCancelled);
        }

        Ok(pair.access_token)
    }

    /// A logout landed while the new tokens were being persisted; remove what
    /// this cycle wrote unless something newer replaced it.
    async fn discard_superseded(&self, pair: &TokenPair) {
        if self.cache.get().as_deref() == Some(pair.access_token.as_str()) {
            self.cache.clear();
        }
        if let Some(ref rotated) = pair.refresh_token {
            if let Ok(Some(stored)) = self.store.get(&self.refresh_token_key).await {
                if &stored == rotated {
                    let _ = self.store.delete(&self.refresh_token_key).await;
                }
            }
        }
    }

    async fn call_refresh_endpoint(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let body = serde_json::to_string(&RefreshRequest { refresh_token })
            .map_err(|e| AuthError::RefreshFailed { reason: e.into() })?;
        let request = HttpRequest::new(Method::Post, self.refresh_url.clone())
            .with_header("Content-Type", "application/json")
            .with_body(body);

        let response = match tokio::time::timeout(self.timeout, self.http.execute(&request)).await {
            Err(_) => {
                return Err(AuthError::RefreshFailed {
                    reason: NetworkError::Timeout {
                        operation: "token refresh".to_string(),
                        duration_secs: self.timeout.as_secs(),
                    },
                })
            }
            Ok(Err(e)) => {
                return Err(AuthError::RefreshFailed {
                    reason: NetworkError::from_http(e, &self.refresh_url),
                })
            }
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            let status = response.status;
            let message = response.text().unwrap_or_default();
            return Err(if (400..500).contains(&status) {
                AuthError::RefreshRejected { status, message }
            } else {
                AuthError::RefreshFailed {
                    reason: NetworkError::HttpStatus { status, message },
                }
            });
        }

        response
            .json::<TokenPair>()
            .map_err(|e| AuthError::RefreshFailed { reason: e.into() })
    }
}

/// Held by a logout while it clears local credentials.
#[must_use = "the logout window closes as soon as the guard is dropped"]
pub struct SignOutGuard<'a> {
    coordinator: &'a RefreshCoordinator,
}

impl Drop for SignOutGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.coordinator.lock_state();
        state.signing_out = state.signing_out.saturating_sub(1);
    }
}

/// Settles the cycle if the leader's future is dropped before it could.
struct CycleGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    generation: u64,
    armed: bool,
    error: AuthError,
}

impl<'a> CycleGuard<'a> {
    fn new(coordinator: &'a RefreshCoordinator, generation: u64) -> Self {
        Self {
            coordinator,
            generation,
            armed: true,
            error: AuthError::RefreshCancelled,
        }
    }

    fn fail_with(&mut self, error: AuthError) {
        self.error = error;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("Refresh abandoned before settling: {}", self.error);
            let error = std::mem::replace(&mut self.error, AuthError::RefreshCancelled);
            self.coordinator.finish_cycle(self.generation, Err(error));
        }
    }
}
