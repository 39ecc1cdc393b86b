//! Sign-in, restore and sign-out against a real session file.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use tokio::sync::Notify;

use pos_console::api::{Authenticator, LoginFailure, LoginResponse};
use pos_console::services::auth::JwtClaimsDecoder;
use pos_console::storage::MemoryStorage;
use pos_console::{AuthError, Credentials, Decision, RouteTable, SessionStore, decide};
use pos_console_integration_tests::{StubAuthenticator, credentials, file_store, token_for};

#[tokio::test]
async fn test_login_then_logout_leaves_no_session_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = file_store(
        StubAuthenticator::issuing(token_for("cajero@tienda.ec", &["Usuario"])),
        &path,
    );
    store
        .login(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap();
    assert!(path.exists());

    store.logout();
    assert!(!path.exists());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_logout_keeps_unrelated_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

    let store = file_store(StubAuthenticator::issuing("opaque"), &path);
    store.login(&credentials("a@b.co", "Abc123")).await.unwrap();
    store.logout();

    let remaining: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(remaining, serde_json::json!({"theme": "dark"}));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = file_store(
        StubAuthenticator::issuing(token_for("admin@tienda.ec", &["Admin", "Usuario"])),
        &path,
    );
    first
        .login(&credentials("admin@tienda.ec", "Abc123"))
        .await
        .unwrap();
    let before = first.session();
    drop(first);

    let restarted = file_store(StubAuthenticator::rejecting(None), &path);
    assert_eq!(restarted.session(), before);
    assert!(restarted.is_admin());
    assert_eq!(restarted.session().user_email(), Some("admin@tienda.ec"));
}

#[test]
fn test_corrupt_roles_restore_as_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(
        &path,
        r#"{"token":"tok","userEmail":"a@b.co","userRoles":"{not json"}"#,
    )
    .unwrap();

    let store = file_store(StubAuthenticator::rejecting(None), &path);
    assert!(!store.is_authenticated());
    assert!(store.session().roles().is_empty());
    assert_eq!(store.session().user_email(), None);
}

#[test]
fn test_corrupt_file_restores_as_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "token=tok").unwrap();

    let store = file_store(StubAuthenticator::rejecting(None), &path);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_failed_login_clears_persisted_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let signed_in = file_store(StubAuthenticator::issuing("opaque"), &path);
    signed_in.login(&credentials("a@b.co", "Abc123")).await.unwrap();

    let store = file_store(StubAuthenticator::rejecting(Some("Cuenta bloqueada")), &path);
    assert!(store.is_authenticated());

    let err = store.login(&credentials("a@b.co", "wrong")).await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref m) if m == "Cuenta bloqueada"));
    assert!(!store.is_authenticated());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_concurrent_logins_commit_whole_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = file_store(
        StubAuthenticator::issuing(token_for("admin@tienda.ec", &["Admin"])),
        &path,
    );

    let uno = credentials("uno@tienda.ec", "Abc123");
    let dos = credentials("dos@tienda.ec", "Abc123");
    let (a, b) = tokio::join!(store.login(&uno), store.login(&dos));
    a.unwrap();
    b.unwrap();

    let restored = file_store(StubAuthenticator::rejecting(None), &path);
    assert_eq!(restored.session(), store.session());
    assert!(restored.is_admin());
}

/// Issues its token only once the gate is opened.
struct GatedAuthenticator {
    gate: Arc<Notify>,
    token: String,
}

impl Authenticator for GatedAuthenticator {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<LoginResponse, LoginFailure> {
        self.gate.notified().await;
        Ok(LoginResponse {
            token: Some(self.token.clone()),
        })
    }
}

#[tokio::test]
async fn test_login_in_flight_is_signed_out() {
    let gate = Arc::new(Notify::new());
    let store = SessionStore::restore(
        GatedAuthenticator {
            gate: Arc::clone(&gate),
            token: token_for("admin@tienda.ec", &["Admin"]),
        },
        Box::new(JwtClaimsDecoder::default()),
        Box::new(MemoryStorage::default()),
    );
    let routes = RouteTable::builtin();

    let admin = credentials("admin@tienda.ec", "Abc123");
    let (result, ()) = tokio::join!(store.login(&admin), async {
        tokio::task::yield_now().await;
        assert!(!store.is_authenticated());
        assert!(store.authorization_header().is_none());
        assert_eq!(
            decide(&routes.resolve("/app/pos"), &store.session()),
            Decision::RedirectToLogin
        );
        gate.notify_one();
    });

    let session = result.unwrap();
    assert!(session.is_admin());
    assert!(store.is_authenticated());
    assert!(store.is_admin());
    assert_eq!(
        decide(&routes.resolve("/app/pos"), &store.session()),
        Decision::Proceed
    );
}
