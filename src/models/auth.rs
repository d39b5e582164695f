use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from token-issuing endpoints (login, Google sign-in, refresh).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    /// Absent when the server does not rotate the refresh credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/auth/verify`.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

/// Body of `POST /api/auth/google`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest<'a> {
    pub id_token: &'a str,
}

/// Body of `POST /api/auth/refresh` and `POST /api/auth/logout`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Unverified claims read from a JWT access credential, for display only.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccessClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl AccessClaims {
    /// Decode the payload segment of a JWT. Returns `None` for opaque tokens.
    pub fn decode(access_token: &str) -> Option<Self> {
        let payload = access_token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => Utc::now().timestamp() >= exp,
            None => false,
        }
    }
}
