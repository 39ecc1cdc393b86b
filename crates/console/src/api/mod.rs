//! Back-office API access.
//!
//! Only the login exchange and bearer header live here; the product,
//! customer and order endpoints belong to the UI layer.

pub mod auth;

pub use auth::{
    Authenticator, HttpAuthenticator, LOGIN_PATH, LoginFailure, LoginResponse, with_bearer,
};

use thiserror::Error;

/// Errors building an API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot host the API paths.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
