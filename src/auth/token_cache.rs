//! In-memory slot for the short-lived access credential.
//!
//! The access credential is never written to durable storage; a cold start
//! always goes through refresh or login.

use std::sync::{Arc, RwLock};

/// Process-wide holder of the current access credential.
///
/// Cloning yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    slot: Arc<RwLock<Option<String>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot. `None` clears it.
    pub fn set(&self, token: Option<String>) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }

    pub fn get(&self) -> Option<String> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn is_set(&self) -> bool {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}
