//! Integration tests for sign-in, logout and cold-start session restore,
//! with the refresh credential kept in a real credential file.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use lingua::adapters::FileCredentialStore;
use lingua::error::{ClientError, NetworkError};
use lingua::traits::CredentialStore;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(serde_json::json!({
            "username": "ania",
            "password": "hunter2",
        })))
        .respond_with(tokens("T1", "R1"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_then_restore_in_new_process() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_login(&server).await;
    mount_refresh(&server, "R1", "T2", "R2", Duration::ZERO, 1).await;
    mount_protected(&server, "/api/flashcards", "T2").await;

    let first = client_for(&server, Arc::new(FileCredentialStore::with_dir(dir.path())), TIMEOUT);
    first.login("ania", "hunter2").await.unwrap();
    assert_eq!(first.access_token().as_deref(), Some("T1"));
    drop(first);

    // Access credentials are memory-only; only the refresh credential survives.
    let store = FileCredentialStore::with_dir(dir.path());
    assert_eq!(
        store.get(REFRESH_KEY).await.unwrap().as_deref(),
        Some("R1")
    );

    let second = client_for(&server, Arc::new(store), TIMEOUT);
    assert!(second.access_token().is_none());
    assert!(second.restore_session().await.unwrap());
    assert_eq!(second.access_token().as_deref(), Some("T2"));

    let response = second.get("/api/flashcards").await.unwrap();
    assert_eq!(response.status, 200);

    let reopened = FileCredentialStore::with_dir(dir.path());
    assert_eq!(
        reopened.get(REFRESH_KEY).await.unwrap().as_deref(),
        Some("R2")
    );
    server.verify().await;
}

#[tokio::test]
async fn test_restore_without_stored_credential_stays_offline() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_refresh_rejected(&server, Duration::ZERO, 0).await;

    let client = client_for(&server, Arc::new(FileCredentialStore::with_dir(dir.path())), TIMEOUT);

    assert!(!client.restore_session().await.unwrap());
    server.verify().await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_with_revoked_credential() {
    let session = TestSession::start().await;
    session.store.insert(REFRESH_KEY, "R0");
    mount_refresh_rejected(&session.server, Duration::ZERO, 1).await;

    assert!(!session.client.restore_session().await.unwrap());
    assert!(session.store.value(REFRESH_KEY).is_none());
    assert_eq!(session.invalidation_count(), 1);
    session.server.verify().await;
}

#[tokio::test]
async fn test_logout_revokes_and_forgets() {
    let session = TestSession::start().await.with_expired_session("T1", "R1");
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(body_json(serde_json::json!({ "refreshToken": "R1" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&session.server)
        .await;

    session.client.logout().await.unwrap();

    session.server.verify().await;
    assert!(session.client.access_token().is_none());
    assert!(session.store.value(REFRESH_KEY).is_none());
    assert!(!session.client.coordinator().is_refreshing());
    assert_eq!(session.invalidation_count(), 0);
}

#[tokio::test]
async fn test_logout_with_expired_access_token_does_not_refresh() {
    let session = TestSession::start().await.with_expired_session("T1", "R1");
    mount_unauthorized(&session.server, "/api/auth/logout").await;
    mount_refresh_rejected(&session.server, Duration::ZERO, 0).await;

    session.client.logout().await.unwrap();

    session.server.verify().await;
    assert!(session.store.value(REFRESH_KEY).is_none());
}

#[tokio::test]
async fn test_register_conflict_and_verify() {
    let session = TestSession::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("username taken"))
        .mount(&session.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify"))
        .and(body_json(serde_json::json!({
            "email": "ania@example.com",
            "code": "123456",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&session.server)
        .await;

    let err = session
        .client
        .register("ania", "ania@example.com", "hunter2")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Network(NetworkError::HttpStatus { status: 409, .. })
    ));

    session
        .client
        .verify_email("ania@example.com", "123456")
        .await
        .unwrap();
    session.server.verify().await;
}
