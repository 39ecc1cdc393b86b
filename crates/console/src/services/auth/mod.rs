//! Console authentication service.
//!
//! [`SessionStore`] owns the signed-in identity. It is built once at startup
//! from durable storage and handed to whoever needs to sign in, sign out, or
//! consult the current session.

pub mod claims;
mod error;

pub use claims::{ClaimsDecoder, ClaimsError, DEFAULT_ROLE_CLAIM, JwtClaimsDecoder, TokenClaims};
pub use error::{AuthError, GENERIC_LOGIN_FAILURE};

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::instrument;

use pos_console_core::RoleSet;

use crate::api::Authenticator;
use crate::models::{Credentials, Session, session_keys};
use crate::storage::SessionStorage;

/// Holder of the process-wide session.
///
/// Readers always see a whole session: either the one before a login
/// completed or the one it committed, never a mix.
pub struct SessionStore<A> {
    authenticator: A,
    decoder: Box<dyn ClaimsDecoder>,
    storage: Box<dyn SessionStorage>,
    state: RwLock<Session>,
}

impl<A: Authenticator> SessionStore<A> {
    /// Build a store, hydrating the session from `storage`.
    ///
    /// A stored session that is incomplete or malformed is ignored.
    pub fn restore(
        authenticator: A,
        decoder: Box<dyn ClaimsDecoder>,
        storage: Box<dyn SessionStorage>,
    ) -> Self {
        let session = match storage.load() {
            Ok(entries) => session_from_entries(&entries),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session, starting signed out");
                Session::empty()
            }
        };

        if session.is_authenticated() {
            tracing::debug!(email = ?session.user_email(), "Restored session");
        }

        Self {
            authenticator,
            decoder,
            storage,
            state: RwLock::new(session),
        }
    }

    /// A snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.read().clone()
    }

    /// Whether a bearer token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Whether the signed-in user holds the `Admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.read().is_admin()
    }

    /// `Authorization` header value for API requests, if signed in.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.state.read().authorization_header()
    }

    /// Sign in with `credentials`.
    ///
    /// On success the new session is committed to memory and storage and
    /// returned. On failure the session is cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoTokenIssued` if the server issued no token,
    /// `AuthError::Rejected` with the server's message, `AuthError::Failed`
    /// when no message is available, or `AuthError::Storage` if the session
    /// could not be saved.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let result = match self.try_login(credentials).await {
            Ok(session) => self.commit(session),
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                tracing::info!(admin = session.is_admin(), "Signed in");
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed, clearing session");
                self.clear();
                Err(e)
            }
        }
    }

    /// Sign out. Never fails; storage errors are logged.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.clear();
        tracing::info!("Signed out");
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = self.authenticator.authenticate(credentials).await?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NoTokenIssued)?;

        let claims = match self.decoder.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::error!(error = %e, "Could not decode token claims, using default role");
                TokenClaims::default()
            }
        };

        let roles = claims.roles.unwrap_or_else(|| {
            tracing::warn!("Token carries no role claim, using default role");
            RoleSet::default_role()
        });

        let user_email = claims
            .email
            .or(claims.subject)
            .unwrap_or_else(|| credentials.email().as_str().to_owned());

        Ok(Session::authenticated(token, user_email, roles))
    }

    /// Write `session` to storage and memory as one step.
    fn commit(&self, session: Session) -> Result<Session, AuthError> {
        let mut state = self.state.write();

        let roles = session.roles().to_json();
        self.storage.store(&[
            (session_keys::TOKEN, session.token().unwrap_or_default()),
            (session_keys::USER_EMAIL, session.user_email().unwrap_or_default()),
            (session_keys::USER_ROLES, &roles),
        ])?;

        *state = session.clone();
        Ok(session)
    }

    fn clear(&self) {
        let mut state = self.state.write();
        if let Err(e) = self.storage.remove(&session_keys::ALL) {
            tracing::error!(error = %e, "Could not remove stored session");
        }
        *state = Session::empty();
    }
}

/// Rebuild a session from stored entries, all or nothing.
fn session_from_entries(entries: &BTreeMap<String, String>) -> Session {
    let token = entries.get(session_keys::TOKEN).filter(|t| !t.is_empty());
    let email = entries.get(session_keys::USER_EMAIL);
    let roles = entries.get(session_keys::USER_ROLES);

    let (Some(token), Some(email), Some(roles)) = (token, email, roles) else {
        if entries.keys().any(|k| session_keys::ALL.contains(&k.as_str())) {
            tracing::warn!("Stored session is incomplete, ignoring it");
        }
        return Session::empty();
    };

    match RoleSet::from_json(roles) {
        Ok(roles) => Session::authenticated(token.clone(), email.clone(), roles),
        Err(e) => {
            tracing::warn!(error = %e, "Stored role set is malformed, ignoring session");
            Session::empty()
        }
    }
}
