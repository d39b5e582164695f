//! Session authentication state.
//!
//! - [`TokenCache`]: in-memory access credential
//! - [`SessionNotifier`]: listeners told when the session ends
//! - [`RefreshCoordinator`]: single-flight token refresh with a wait queue

pub mod coordinator;
pub mod session;
pub mod token_cache;

pub use coordinator::{PendingRequest, RefreshCoordinator, SignOutGuard};
pub use session::{SessionCallback, SessionEvent, SessionNotifier};
pub use token_cache::TokenCache;
