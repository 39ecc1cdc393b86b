//! Session-related types for console authentication.
//!
//! Types held in memory and persisted for the signed-in user.

use secrecy::{ExposeSecret, SecretString};

use pos_console_core::{Email, EmailError, RoleSet};

/// The signed-in identity.
///
/// A session is authenticated exactly when it holds a non-empty token.
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user_email: Option<String>,
    roles: RoleSet,
}

impl Session {
    /// A signed-out session.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A session for a freshly issued token.
    #[must_use]
    pub fn authenticated(token: String, user_email: String, roles: RoleSet) -> Self {
        Self {
            token: Some(token),
            user_email: Some(user_email),
            roles,
        }
    }

    /// Whether a bearer token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the roles include `Admin`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The signed-in user's email (or token subject).
    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// The user's roles. Empty when signed out.
    #[must_use]
    pub const fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// `Authorization` header value for API requests.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}"))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_email", &self.user_email)
            .field("roles", &self.roles)
            .finish()
    }
}

/// Login form input.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: SecretString,
}

impl Credentials {
    /// Build credentials, validating the email first.
    ///
    /// # Errors
    ///
    /// Returns an error if `email` is not a well-formed address.
    pub fn new(email: &str, password: SecretString) -> Result<Self, EmailError> {
        Ok(Self {
            email: Email::parse(email)?,
            password,
        })
    }

    /// The email entered on the form.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// The password entered on the form.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Storage keys for the persisted session.
///
/// All three are written and removed together.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the signed-in user's email.
    pub const USER_EMAIL: &str = "userEmail";

    /// Key for the role set, stored as a JSON array.
    pub const USER_ROLES: &str = "userRoles";

    /// Every session key.
    pub const ALL: [&str; 3] = [TOKEN, USER_EMAIL, USER_ROLES];
}
