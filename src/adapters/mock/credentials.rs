//! In-memory credential store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{CredentialStore, CredentialsError};

/// In-memory key-value credential store.
///
/// Each operation can be told to fail so tests can drive the storage error
/// paths without touching the file system.
///
/// # Example
///
/// ```ignore
/// use lingua::adapters::mock::InMemoryCredentialStore;
/// use lingua::traits::CredentialStore;
///
/// let store = InMemoryCredentialStore::new();
/// store.set("lingua_refresh_token", "R1").await?;
/// assert_eq!(store.get("lingua_refresh_token").await?.as_deref(), Some("R1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    get_should_fail: Arc<Mutex<bool>>,
    set_should_fail: Arc<Mutex<bool>>,
    delete_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.insert(key, value);
        store
    }

    /// Seed an entry directly, bypassing the failure toggles.
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Remove an entry directly, bypassing the failure toggles.
    pub fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }

    /// Read an entry directly, bypassing the failure toggles.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn set_get_should_fail(&self, should_fail: bool) {
        *self.get_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_set_should_fail(&self, should_fail: bool) {
        *self.set_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_delete_should_fail(&self, should_fail: bool) {
        *self.delete_should_fail.lock().unwrap() = should_fail;
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialsError> {
        if *self.get_should_fail.lock().unwrap() {
            return Err(CredentialsError::LoadFailed(
                "Simulated load failure".to_string(),
            ));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialsError> {
        if *self.set_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed(
                "Simulated save failure".to_string(),
            ));
        }
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CredentialsError> {
        if *self.delete_should_fail.lock().unwrap() {
            return Err(CredentialsError::ClearFailed(
                "Simulated clear failure".to_string(),
            ));
        }
        self.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = InMemoryCredentialStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryCredentialStore::new();
        assert!(store.delete("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_toggles() {
        let store = InMemoryCredentialStore::with_entry("k", "v");

        store.set_get_should_fail(true);
        assert!(matches!(
            store.get("k").await,
            Err(CredentialsError::LoadFailed(_))
        ));

        store.set_set_should_fail(true);
        assert!(matches!(
            store.set("k", "w").await,
            Err(CredentialsError::SaveFailed(_))
        ));

        store.set_delete_should_fail(true);
        assert!(matches!(
            store.delete("k").await,
            Err(CredentialsError::ClearFailed(_))
        ));

        assert_eq!(store.value("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryCredentialStore::new();
        let other = store.clone();
        store.set("k", "v").await.unwrap();
        assert_eq!(other.value("k").as_deref(), Some("v"));
    }
}
