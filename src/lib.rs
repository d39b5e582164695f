//! Lingua API client - authenticated HTTP access with single-flight token
//! refresh.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;
