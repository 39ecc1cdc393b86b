//! Integration tests for the POS console.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pos-console-integration-tests
//! ```
//!
//! No external services are needed: the login API is replaced either by a
//! [`StubAuthenticator`] or by a local HTTP server from
//! [`spawn_login_server`].
//!
//! # Test Categories
//!
//! - `session_flow` - Sign-in, restore and sign-out against a session file
//! - `guard_flow` - Navigation outcomes for signed-in and signed-out users
//! - `http_login` - The HTTP authenticator against a local server

use std::net::SocketAddr;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::SecretString;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use pos_console::api::{Authenticator, LoginFailure, LoginResponse};
use pos_console::services::auth::{DEFAULT_ROLE_CLAIM, JwtClaimsDecoder};
use pos_console::storage::FileStorage;
use pos_console::{Credentials, SessionStore};

/// Build an unsigned JWT carrying `payload`.
#[must_use]
pub fn token_with(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.sig")
}

/// Unsigned JWT for a user holding `roles`.
#[must_use]
pub fn token_for(email: &str, roles: &[&str]) -> String {
    token_with(&serde_json::json!({
        DEFAULT_ROLE_CLAIM: roles,
        "email": email,
    }))
}

/// Login form input.
///
/// # Panics
///
/// Panics if `email` is malformed.
#[must_use]
pub fn credentials(email: &str, password: &str) -> Credentials {
    Credentials::new(email, SecretString::from(password.to_owned())).expect("Invalid test email")
}

/// Authenticator with a canned reply.
#[derive(Debug, Clone)]
pub struct StubAuthenticator {
    reply: Result<LoginResponse, LoginFailure>,
}

impl StubAuthenticator {
    /// Issues `token` for any credentials.
    #[must_use]
    pub fn issuing(token: impl Into<String>) -> Self {
        Self {
            reply: Ok(LoginResponse {
                token: Some(token.into()),
            }),
        }
    }

    /// Refuses every login with `message`.
    #[must_use]
    pub fn rejecting(message: Option<&str>) -> Self {
        Self {
            reply: Err(LoginFailure::Rejected {
                message: message.map(str::to_owned),
            }),
        }
    }
}

impl Authenticator for StubAuthenticator {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<LoginResponse, LoginFailure> {
        self.reply.clone()
    }
}

/// Session store persisting to the file at `path`.
#[must_use]
pub fn file_store(
    authenticator: StubAuthenticator,
    path: &std::path::Path,
) -> SessionStore<StubAuthenticator> {
    SessionStore::restore(
        authenticator,
        Box::new(JwtClaimsDecoder::default()),
        Box::new(FileStorage::new(path)),
    )
}

/// A request captured by [`spawn_login_server`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line, e.g. `POST /api/Auth/login HTTP/1.1`.
    pub request_line: String,
    /// Request body.
    pub body: String,
}

/// Serve one HTTP response on a local port, then stop.
///
/// Returns the server's base URL and a handle resolving to the request it
/// received.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_login_server(
    status: u16,
    body: impl Into<String>,
) -> (Url, tokio::task::JoinHandle<Option<CapturedRequest>>) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    let body = body.into();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.ok()?;
        let request = read_request(&mut socket).await?;

        let response = format!(
            "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {len}\r\nconnection: close\r\n\r\n{body}",
            reason = if status < 400 { "OK" } else { "Error" },
            len = body.len(),
        );
        socket.write_all(response.as_bytes()).await.ok()?;
        socket.shutdown().await.ok()?;
        Some(request)
    });

    let url = Url::parse(&format!("http://{addr}/")).expect("Invalid server URL");
    (url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(chunk.get(..n)?);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(buf.get(..header_end)?).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(chunk.get(..n)?);
    }

    Some(CapturedRequest {
        request_line: head.lines().next().unwrap_or_default().to_owned(),
        body: String::from_utf8_lossy(buf.get(header_end..)?).into_owned(),
    })
}
