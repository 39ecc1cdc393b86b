//! Role names carried by a signed-in user.
//!
//! Roles are a flat list of names issued by the API inside the bearer token.
//! Only two names carry meaning on the client: [`ADMIN_ROLE`] unlocks the
//! admin screens and [`DEFAULT_ROLE`] is assigned when the token has no
//! usable role claim.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role name that grants access to admin-only screens.
pub const ADMIN_ROLE: &str = "Admin";

/// Unprivileged role assigned when the token carries no role claim.
pub const DEFAULT_ROLE: &str = "Usuario";

/// A set of role names.
///
/// Serialized as a JSON array of strings, which is also the persisted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Create an empty role set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// The set containing only [`DEFAULT_ROLE`].
    #[must_use]
    pub fn default_role() -> Self {
        Self::single(DEFAULT_ROLE)
    }

    /// A set containing one role.
    #[must_use]
    pub fn single(role: impl Into<String>) -> Self {
        Self(BTreeSet::from([role.into()]))
    }

    /// Whether the set contains `role` (case-sensitive).
    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// Whether the set contains [`ADMIN_ROLE`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.contains(ADMIN_ROLE)
    }

    /// Number of distinct roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over role names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Serialize to the persisted JSON array form.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A set of strings always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Parse the persisted JSON array form.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of strings.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}
