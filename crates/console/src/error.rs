//! Console startup errors.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Errors building the console state.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API client could not be set up.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}
