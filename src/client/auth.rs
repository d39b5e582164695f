//! Account operations: sign-in, registration, logout and session restore.

use chrono::{DateTime, Utc};

use super::ApiClient;
use crate::error::{AuthError, ClientError, ClientResult};
use crate::models::{
    AccessClaims, GoogleLoginRequest, LoginRequest, RefreshRequest, RegisterRequest,
    RequestDescriptor, TokenPair, VerificationRequest,
};

/// What the client currently knows about the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// An access credential is cached.
    pub authenticated: bool,
    /// `sub` claim of the access credential, when it is a JWT.
    pub subject: Option<String>,
    /// `exp` claim of the access credential, when it is a JWT.
    pub expires_at: Option<DateTime<Utc>>,
    pub refreshing: bool,
}

impl SessionSnapshot {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

impl ApiClient {
    /// Sign in with username and password.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenPair> {
        let path = &self.inner.config.endpoints.login;
        let request = RequestDescriptor::post(path).json(&LoginRequest { username, password })?;
        let pair: TokenPair = self.dispatch(request).await?.json()?;

        self.establish_session(&pair).await?;
        tracing::info!("Signed in as {}", username);
        Ok(pair)
    }

    /// Create an account. The server answers 409 when it already exists.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<()> {
        let path = &self.inner.config.endpoints.register;
        let request = RequestDescriptor::post(path).json(&RegisterRequest {
            username,
            email,
            password,
        })?;
        self.dispatch(request).await?;
        tracing::info!("Registered account {}", username);
        Ok(())
    }

    /// Confirm an email address with the code the server sent.
    pub async fn verify_email(&self, email: &str, code: &str) -> ClientResult<()> {
        let path = &self.inner.config.endpoints.verify;
        let request =
            RequestDescriptor::post(path).json(&VerificationRequest { email, code })?;
        self.dispatch(request).await?;
        Ok(())
    }

    /// Sign in with a Google ID token.
    pub async fn google_login(&self, id_token: &str) -> ClientResult<TokenPair> {
        let path = &self.inner.config.endpoints.google;
        let request = RequestDescriptor::post(path).json(&GoogleLoginRequest { id_token })?;
        let pair: TokenPair = self.dispatch(request).await?.json()?;

        self.establish_session(&pair).await?;
        tracing::info!("Signed in with Google");
        Ok(pair)
    }

    /// End the session.
    ///
    /// Local credentials are cleared first, with new refresh cycles held off
    /// until the refresh credential is gone. The server is then asked to
    /// revoke it; the outcome of that call does not matter.
    pub async fn logout(&self) -> ClientResult<()> {
        let inner = &self.inner;
        let key = &inner.config.refresh_token_key;
        let access_token = inner.cache.get();
        let sign_out = inner.coordinator.begin_sign_out();

        let stored = match inner.store.get(key).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Could not read refresh token for logout: {}", e);
                None
            }
        };
        let deleted = inner.store.delete(key).await;

        if let Some(refresh_token) = stored.as_deref() {
            let mut request = RequestDescriptor::post(&inner.config.endpoints.logout)
                .json(&RefreshRequest { refresh_token })?;
            if let Some(token) = access_token {
                request = request.with_header("Authorization", format!("Bearer {}", token));
            }
            if let Err(e) = self.dispatch(request).await {
                tracing::warn!("Logout request failed: {}", e);
            }
        }

        drop(sign_out);
        deleted.map_err(ClientError::Storage)?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Cold-start recovery: trade the stored refresh credential for an access
    /// credential.
    ///
    /// Returns `false` without touching the network when nothing is stored,
    /// and `false` when the server no longer accepts the stored credential.
    pub async fn restore_session(&self) -> ClientResult<bool> {
        let inner = &self.inner;
        let stored = inner
            .store
            .get(&inner.config.refresh_token_key)
            .await
            .map_err(ClientError::Storage)?;

        if stored.map_or(true, |token| token.is_empty()) {
            tracing::debug!("No stored session");
            return Ok(false);
        }

        match inner.coordinator.refresh_now().await {
            Ok(_) => {
                inner.notifier.notify_authenticated();
                Ok(true)
            }
            Err(AuthError::RefreshRejected { .. }) | Err(AuthError::NoCredentialAvailable) => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        let refreshing = self.inner.coordinator.is_refreshing();
        match self.inner.cache.get() {
            Some(token) => {
                let claims = AccessClaims::decode(&token).unwrap_or_default();
                SessionSnapshot {
                    authenticated: true,
                    expires_at: claims.expires_at(),
                    subject: claims.sub,
                    refreshing,
                }
            }
            None => SessionSnapshot {
                refreshing,
                ..SessionSnapshot::default()
            },
        }
    }

    async fn establish_session(&self, pair: &TokenPair) -> ClientResult<()> {
        let inner = &self.inner;
        inner.cache.set(Some(pair.access_token.clone()));
        if let Some(ref refresh_token) = pair.refresh_token {
            inner
                .store
                .set(&inner.config.refresh_token_key, refresh_token)
                .await
                .map_err(ClientError::Storage)?;
        }
        inner.notifier.notify_authenticated();
        Ok(())
    }
}
