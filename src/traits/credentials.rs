//! Credential store trait abstraction.
//!
//! The store is a plain async key-value capability used to keep the
//! long-lived refresh credential across process restarts.

use async_trait::async_trait;

/// Credential store operation errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to load a value
    LoadFailed(String),
    /// Failed to save a value
    SaveFailed(String),
    /// Failed to delete a value
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

impl From<std::io::Error> for CredentialsError {
    fn from(e: std::io::Error) -> Self {
        CredentialsError::Io(e.to_string())
    }
}

/// Async key-value store for credentials.
///
/// # Example
///
/// ```ignore
/// use lingua::traits::CredentialStore;
///
/// async fn rotate<S: CredentialStore>(store: &S, new_refresh: &str) -> Result<(), CredentialsError> {
///     if store.get("refresh_token").await?.is_some() {
///         store.set("refresh_token", new_refresh).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if a value is stored
    /// - `Ok(None)` if nothing is stored under the key
    /// - `Err(error)` if reading failed
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialsError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialsError>;

    /// Remove the value stored under `key`.
    ///
    /// Removing a key that is not present succeeds.
    async fn delete(&self, key: &str) -> Result<(), CredentialsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::LoadFailed("read error".to_string()).to_string(),
            "Failed to load credentials: read error"
        );
        assert_eq!(
            CredentialsError::SaveFailed("write error".to_string()).to_string(),
            "Failed to save credentials: write error"
        );
        assert_eq!(
            CredentialsError::ClearFailed("delete error".to_string()).to_string(),
            "Failed to clear credentials: delete error"
        );
        assert_eq!(
            CredentialsError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CredentialsError = io.into();
        assert!(matches!(err, CredentialsError::Io(ref msg) if msg.contains("denied")));
    }
}
