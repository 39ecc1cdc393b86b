//! Reading identity claims out of a bearer token.
//!
//! The console trusts the token it was just handed by the API, so claims are
//! read without verifying the signature.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};
use thiserror::Error;

use pos_console_core::RoleSet;

/// Claim key the API uses for role names.
pub const DEFAULT_ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Errors decoding a token's claims.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token has no payload segment.
    #[error("token has no payload segment")]
    MissingPayload,

    /// The payload segment is not base64url.
    #[error("invalid token payload encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not JSON.
    #[error("invalid token payload JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but not an object.
    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Identity claims relevant to the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    /// Roles, if the role claim is a string or an array.
    pub roles: Option<RoleSet>,
    /// The `email` claim, if non-empty.
    pub email: Option<String>,
    /// The `sub` claim, if non-empty.
    pub subject: Option<String>,
}

impl TokenClaims {
    /// Extract the console's claims from a decoded payload.
    #[must_use]
    pub fn from_payload(payload: &Map<String, Value>, role_claim: &str) -> Self {
        let roles = match payload.get(role_claim) {
            Some(Value::Array(items)) => Some(items.iter().filter_map(Value::as_str).collect()),
            Some(Value::String(role)) => Some(RoleSet::single(role.as_str())),
            _ => None,
        };

        Self {
            roles,
            email: non_empty_string(payload.get("email")),
            subject: non_empty_string(payload.get("sub")),
        }
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Turns a bearer token into claims.
pub trait ClaimsDecoder: Send + Sync {
    /// Decode `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be read.
    fn decode(&self, token: &str) -> Result<TokenClaims, ClaimsError>;
}

/// Decoder for JWTs (`header.payload.signature`).
#[derive(Debug, Clone)]
pub struct JwtClaimsDecoder {
    role_claim: String,
}

impl JwtClaimsDecoder {
    /// Decoder reading roles from `role_claim`.
    #[must_use]
    pub fn new(role_claim: impl Into<String>) -> Self {
        Self {
            role_claim: role_claim.into(),
        }
    }

    /// The claim key roles are read from.
    #[must_use]
    pub fn role_claim(&self) -> &str {
        &self.role_claim
    }
}

impl Default for JwtClaimsDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_CLAIM)
    }
}

impl ClaimsDecoder for JwtClaimsDecoder {
    fn decode(&self, token: &str) -> Result<TokenClaims, ClaimsError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or(ClaimsError::MissingPayload)?;

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;

        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(TokenClaims::from_payload(&map, &self.role_claim)),
            _ => Err(ClaimsError::NotAnObject),
        }
    }
}

/// Build an unsigned JWT around `payload`, for tests.
#[cfg(test)]
pub(crate) fn encode_test_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
