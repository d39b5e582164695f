//! Session notifications for the application shell.
//!
//! The shell registers callbacks here; the refresh coordinator calls
//! [`SessionNotifier::invalidate`] when the session can no longer be
//! recovered, and the auth operations call
//! [`SessionNotifier::notify_authenticated`] after a successful sign-in.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Payload delivered to session callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEvent {
    pub authenticated: bool,
}

/// Callback type accepted by [`SessionNotifier::register`].
pub type SessionCallback = Arc<dyn Fn(SessionEvent) + Send + Sync>;

/// Registry of session callbacks.
#[derive(Clone, Default)]
pub struct SessionNotifier {
    callbacks: Arc<Mutex<Vec<SessionCallback>>>,
}

impl fmt::Debug for SessionNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionNotifier")
            .field("callbacks", &self.len())
            .finish()
    }
}

impl SessionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Every listener sees every event.
    pub fn register<F>(&self, callback: F)
    where
        F: Fn(SessionEvent) + Send + Sync + 'static,
    {
        self.callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(callback));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.callbacks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tell every listener the session is no longer authenticated.
    pub fn invalidate(&self) {
        tracing::info!("Session invalidated, notifying {} listener(s)", self.len());
        self.emit(SessionEvent {
            authenticated: false,
        });
    }

    /// Tell every listener a session was established.
    pub fn notify_authenticated(&self) {
        self.emit(SessionEvent {
            authenticated: true,
        });
    }

    fn emit(&self, event: SessionEvent) {
        // Snapshot so a callback may register another listener without deadlocking.
        let callbacks: Vec<SessionCallback> = self
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for callback in callbacks {
            callback(event);
        }
    }
}
