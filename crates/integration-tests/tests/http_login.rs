//! The HTTP authenticator against a local login server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pos_console::api::{Authenticator, HttpAuthenticator, LoginFailure};
use pos_console::services::auth::{GENERIC_LOGIN_FAILURE, JwtClaimsDecoder};
use pos_console::storage::MemoryStorage;
use pos_console::{AuthError, SessionStore};
use pos_console_integration_tests::{credentials, spawn_login_server, token_for};

#[tokio::test]
async fn test_successful_login_posts_credentials() {
    let token = token_for("cajero@tienda.ec", &["Usuario"]);
    let (base, server) = spawn_login_server(200, format!(r#"{{"token":"{token}"}}"#)).await;

    let authenticator = HttpAuthenticator::new(&base, Duration::from_secs(5)).unwrap();
    let response = authenticator
        .authenticate(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap();
    assert_eq!(response.token.as_deref(), Some(token.as_str()));

    let request = server.await.unwrap().unwrap();
    assert_eq!(request.request_line, "POST /api/Auth/login HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"email": "cajero@tienda.ec", "password": "Abc123"})
    );
}

#[tokio::test]
async fn test_rejection_message_is_read_from_body() {
    let (base, _server) =
        spawn_login_server(401, r#"{"message":"Usuario o contraseña incorrectos"}"#).await;

    let authenticator = HttpAuthenticator::new(&base, Duration::from_secs(5)).unwrap();
    let err = authenticator
        .authenticate(&credentials("cajero@tienda.ec", "nope"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoginFailure::Rejected { message: Some(ref m) } if m == "Usuario o contraseña incorrectos"
    ));
}

#[tokio::test]
async fn test_store_over_http_without_message_uses_fallback() {
    let (base, _server) = spawn_login_server(500, "Internal Server Error").await;

    let store = SessionStore::restore(
        HttpAuthenticator::new(&base, Duration::from_secs(5)).unwrap(),
        Box::new(JwtClaimsDecoder::default()),
        Box::new(MemoryStorage::new()),
    );
    let err = store
        .login(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Failed));
    assert_eq!(err.to_string(), GENERIC_LOGIN_FAILURE);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_store_over_http_without_token() {
    let (base, _server) = spawn_login_server(200, "{}").await;

    let store = SessionStore::restore(
        HttpAuthenticator::new(&base, Duration::from_secs(5)).unwrap(),
        Box::new(JwtClaimsDecoder::default()),
        Box::new(MemoryStorage::new()),
    );
    let err = store
        .login(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NoTokenIssued));
}

#[tokio::test]
async fn test_unreachable_server_is_generic_failure() {
    // Bind and immediately drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = url::Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();

    let authenticator = HttpAuthenticator::new(&base, Duration::from_secs(2)).unwrap();
    let err = authenticator
        .authenticate(&credentials("cajero@tienda.ec", "Abc123"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoginFailure::Transport(_)));
    assert_eq!(AuthError::from(err).to_string(), GENERIC_LOGIN_FAILURE);
}
