//! Login exchange with the back-office API.
//!
//! Posts the login form as JSON and reads the bearer token from the reply.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use super::ApiError;
use crate::models::{Credentials, Session};

/// Login endpoint, relative to the API base URL.
pub const LOGIN_PATH: &str = "api/Auth/login";

/// Reply to a successful login request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Bearer token. Absent or empty means the server issued none.
    #[serde(default)]
    pub token: Option<String>,
}

/// Why the authentication collaborator refused or failed.
#[derive(Debug, Clone, Error)]
pub enum LoginFailure {
    /// The server answered with an error, possibly explaining why.
    #[error("login rejected: {}", .message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        /// Server-provided message.
        message: Option<String>,
    },

    /// The request did not complete.
    #[error("login request failed: {0}")]
    Transport(String),
}

/// The operation the session store needs from the API.
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a bearer token.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, LoginFailure>> + Send;
}

/// Request body for the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Error body returned by the login endpoint.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`Authenticator`] that calls the back-office API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: reqwest::Client,
    login_url: Url,
}

impl HttpAuthenticator {
    /// Create an authenticator for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the login URL cannot be derived from `base_url` or
    /// the HTTP client cannot be built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            login_url: login_url(base_url)?,
        })
    }

    /// The URL login requests are sent to.
    #[must_use]
    pub const fn login_url(&self) -> &Url {
        &self.login_url
    }
}

impl Authenticator for HttpAuthenticator {
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginResponse, LoginFailure> {
        let response = self
            .client
            .post(self.login_url.clone())
            .json(&LoginRequest {
                email: credentials.email().as_str(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(|e| LoginFailure::Transport(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            return response
                .json::<LoginResponse>()
                .await
                .map_err(|e| LoginFailure::Transport(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        tracing::debug!(%status, has_message = message.is_some(), "Login rejected");

        Err(LoginFailure::Rejected { message })
    }
}

/// Attach the session's bearer token to an outgoing API request.
///
/// Requests from a signed-out session are sent unchanged.
#[must_use]
pub fn with_bearer(request: reqwest::RequestBuilder, session: &Session) -> reqwest::RequestBuilder {
    match session.authorization_header() {
        Some(value) => request.header(reqwest::header::AUTHORIZATION, value),
        None => request,
    }
}

fn login_url(base_url: &Url) -> Result<Url, url::ParseError> {
    // Url::join replaces the last segment unless the base ends with a slash
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(LOGIN_PATH)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pos_console_core::RoleSet;
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_login_url_with_and_without_trailing_slash() {
        let a = login_url(&Url::parse("https://pos.example.ec").unwrap()).unwrap();
        assert_eq!(a.as_str(), "https://pos.example.ec/api/Auth/login");

        let b = login_url(&Url::parse("https://pos.example.ec/backend").unwrap()).unwrap();
        assert_eq!(b.as_str(), "https://pos.example.ec/backend/api/Auth/login");

        let c = login_url(&Url::parse("https://pos.example.ec/backend/").unwrap()).unwrap();
        assert_eq!(c.as_str(), "https://pos.example.ec/backend/api/Auth/login");
    }

    #[test]
    fn test_login_request_body() {
        let credentials = Credentials::new("a@b.c", SecretString::from("Abc123")).unwrap();
        let body = serde_json::to_value(LoginRequest {
            email: credentials.email().as_str(),
            password: credentials.password(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@b.c", "password": "Abc123"}));
    }

    #[test]
    fn test_login_response_token_optional() {
        let with: LoginResponse = serde_json::from_str(r#"{"token":"t","expiration":"x"}"#).unwrap();
        assert_eq!(with.token.as_deref(), Some("t"));

        let without: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(without.token.is_none());
    }

    #[test]
    fn test_with_bearer() {
        let client = reqwest::Client::new();
        let session = Session::authenticated("tok".into(), "a@b.c".into(), RoleSet::new());

        let request = with_bearer(client.get("https://pos.example.ec/api/Products"), &session)
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );

        let request = with_bearer(client.get("https://pos.example.ec/api/Products"), &Session::empty())
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_rejected_display() {
        let err = LoginFailure::Rejected { message: None };
        assert_eq!(err.to_string(), "login rejected: no reason given");
    }
}
