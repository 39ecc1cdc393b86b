//! Console authentication error types.

use thiserror::Error;

use crate::api::LoginFailure;
use crate::storage::StorageError;

/// Message shown when the server gave no reason for a failed login.
pub const GENERIC_LOGIN_FAILURE: &str = "login failed; check your credentials";

/// Errors that can occur while signing in.
///
/// The `Display` text is meant to be shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server accepted the request but issued no token.
    #[error("no token issued")]
    NoTokenIssued,

    /// The server rejected the login and said why.
    #[error("{0}")]
    Rejected(String),

    /// The login failed without a server explanation.
    #[error("login failed; check your credentials")]
    Failed,

    /// The session could not be saved.
    #[error("could not save session: {0}")]
    Storage(#[from] StorageError),
}

impl From<LoginFailure> for AuthError {
    fn from(failure: LoginFailure) -> Self {
        match failure {
            LoginFailure::Rejected {
                message: Some(message),
            } => Self::Rejected(message),
            LoginFailure::Rejected { message: None } => Self::Failed,
            LoginFailure::Transport(detail) => {
                tracing::warn!(error = %detail, "Login request did not complete");
                Self::Failed
            }
        }
    }
}
