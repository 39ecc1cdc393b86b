//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POS_API_BASE_URL` - Base URL of the back-office API
//!
//! ## Optional
//! - `POS_SESSION_FILE` - Where the session is persisted (default: .pos-session.json)
//! - `POS_ROUTES_FILE` - YAML route tree replacing the built-in routes
//! - `POS_ROLE_CLAIM` - Token claim holding role names (default: the WS-Federation role claim)
//! - `POS_HTTP_TIMEOUT_SECS` - Login request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::routes::{RouteConfigError, RouteTable};
use crate::services::auth::DEFAULT_ROLE_CLAIM;

const DEFAULT_SESSION_FILE: &str = ".pos-session.json";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error(transparent)]
    Routes(#[from] RouteConfigError),
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the back-office API.
    pub api_base_url: Url,
    /// File holding the persisted session.
    pub session_file: PathBuf,
    /// YAML route tree; the built-in routes are used when unset.
    pub routes_file: Option<PathBuf>,
    /// Token claim holding role names.
    pub role_claim: String,
    /// Timeout for API requests.
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_base_url = env.required("POS_API_BASE_URL")?;
        let api_base_url = Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("POS_API_BASE_URL".to_string(), e.to_string())
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "POS_API_BASE_URL".to_string(),
                "must be an http(s) base URL".to_string(),
            ));
        }

        let http_timeout = env
            .or_default("POS_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POS_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            session_file: PathBuf::from(env.or_default("POS_SESSION_FILE", DEFAULT_SESSION_FILE)),
            routes_file: env.optional("POS_ROUTES_FILE").map(PathBuf::from),
            role_claim: env.or_default("POS_ROLE_CLAIM", DEFAULT_ROLE_CLAIM),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// Load the route table this configuration points at.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Routes` if the route file is unreadable or
    /// invalid.
    pub fn load_routes(&self) -> Result<RouteTable, ConfigError> {
        match &self.routes_file {
            Some(path) => Ok(RouteTable::from_file(path)?),
            None => Ok(RouteTable::builtin()),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable. Empty counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
