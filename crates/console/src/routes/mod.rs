//! Route declarations and their flattened lookup table.
//!
//! Routes are declared as a tree (built in, or loaded from YAML) and
//! flattened once into a [`RouteTable`]: every path maps straight to its
//! fully-inherited requirements, so deciding a navigation never walks
//! ancestors.
//!
//! # Route file format
//!
//! ```yaml
//! - path: /
//!   name: home
//! - path: /login
//!   name: login
//! - path: /app
//!   requires_auth: true
//!   children:
//!     - path: ""
//!       redirect: /app/pos
//!     - path: pos
//!       name: pos
//!     - path: admin
//!       name: admin
//!       requires_admin: true
//! ```

pub mod guard;
pub mod navigator;

pub use guard::{Decision, decide};
pub use navigator::{Navigation, NavigationStep, Navigator};

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Session;

/// Path every unknown route resolves to.
pub const FALLBACK_PATH: &str = "/";

/// Redirect hops followed before giving up and using the fallback.
pub const MAX_REDIRECTS: usize = 8;

static BUILTIN: LazyLock<RouteTable> = LazyLock::new(|| {
    RouteTable::from_decls(&builtin_decls()).expect("Invalid built-in routes")
});

/// Named screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Public landing page.
    Home,
    /// Sign-in form.
    Login,
    /// Point of sale, the landing screen for signed-in users.
    Pos,
    /// Administration, the landing screen for admins.
    Admin,
}

impl Screen {
    /// Where the screen lives in the built-in route table.
    #[must_use]
    pub const fn default_path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Pos => "/app/pos",
            Self::Admin => "/app/admin",
        }
    }

    /// Lowercase name, as used in route files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Pos => "pos",
            Self::Admin => "admin",
        }
    }

    /// Landing screen for a signed-in session.
    #[must_use]
    pub fn home_for(session: &Session) -> Self {
        if session.is_admin() {
            Self::Admin
        } else {
            Self::Pos
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the declared route tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDecl {
    /// Absolute path, or a path relative to the parent. Empty means the
    /// parent's own path.
    pub path: String,
    /// Screen rendered at this path.
    #[serde(default)]
    pub name: Option<Screen>,
    /// Only signed-in sessions may enter. Inherited by children.
    #[serde(default)]
    pub requires_auth: bool,
    /// Only admins may enter. Implies `requires_auth`. Inherited by children.
    #[serde(default)]
    pub requires_admin: bool,
    /// Absolute path to send the navigation to instead.
    #[serde(default)]
    pub redirect: Option<String>,
    /// Nested routes.
    #[serde(default)]
    pub children: Vec<Self>,
}

impl RouteDecl {
    fn leaf(path: &str, name: Screen) -> Self {
        Self {
            path: path.to_owned(),
            name: Some(name),
            ..Self::default()
        }
    }
}

/// A route with every inherited requirement applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Normalized path.
    pub path: String,
    /// Screen rendered at the path, if named.
    pub screen: Option<Screen>,
    /// Only signed-in sessions may enter.
    pub requires_auth: bool,
    /// Only admins may enter.
    pub requires_admin: bool,
}

impl ResolvedRoute {
    fn home() -> Self {
        Self {
            path: FALLBACK_PATH.to_owned(),
            screen: Some(Screen::Home),
            requires_auth: false,
            requires_admin: false,
        }
    }
}

/// Errors loading route declarations.
#[derive(Debug, Error)]
pub enum RouteConfigError {
    /// The route file could not be read.
    #[error("could not read route file {}: {source}", .path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The route file is not valid YAML for a route tree.
    #[error("invalid route file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No plain route is declared at `/`.
    #[error("routes must declare a non-redirecting route at /")]
    MissingFallback,

    /// A redirect points at an undeclared path.
    #[error("route {from} redirects to undeclared path {to}")]
    UnknownRedirect {
        /// Redirecting path.
        from: String,
        /// Missing target.
        to: String,
    },

    /// Two routes claim the same screen.
    #[error("screen {0} is declared more than once")]
    DuplicateScreen(Screen),

    /// Two routes claim the same path.
    #[error("path {0} is declared more than once")]
    DuplicatePath(String),
}

#[derive(Debug, Clone)]
struct FlatRoute {
    screen: Option<Screen>,
    requires_auth: bool,
    requires_admin: bool,
    redirect: Option<String>,
}

/// Flattened route declarations.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: BTreeMap<String, FlatRoute>,
    screens: BTreeMap<Screen, String>,
}

impl RouteTable {
    /// The console's own routes.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Flatten and check a declared route tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `/` is missing, a path or screen is declared
    /// twice, or a redirect points nowhere.
    pub fn from_decls(decls: &[RouteDecl]) -> Result<Self, RouteConfigError> {
        let mut table = Self {
            routes: BTreeMap::new(),
            screens: BTreeMap::new(),
        };
        for decl in decls {
            table.flatten(decl, "", false, false)?;
        }
        table.validate()?;
        Ok(table)
    }

    /// Parse a YAML route tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the tree is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, RouteConfigError> {
        let decls: Vec<RouteDecl> = serde_yaml::from_str(yaml)?;
        Self::from_decls(&decls)
    }

    /// Read a YAML route tree from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, RouteConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RouteConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Resolve a requested path to the route that will be entered.
    ///
    /// Redirects are followed. Unknown paths and redirect loops resolve to
    /// `/`.
    #[must_use]
    pub fn resolve(&self, requested: &str) -> ResolvedRoute {
        let mut path = normalize(requested);

        for _ in 0..=MAX_REDIRECTS {
            let Some(route) = self.routes.get(&path) else {
                tracing::debug!(path = %path, "No route declared, using fallback");
                return self.fallback();
            };

            match &route.redirect {
                Some(target) => path.clone_from(target),
                None => {
                    return ResolvedRoute {
                        path,
                        screen: route.screen,
                        requires_auth: route.requires_auth,
                        requires_admin: route.requires_admin,
                    };
                }
            }
        }

        tracing::warn!(path = %requested, "Too many redirects, using fallback");
        self.fallback()
    }

    /// Path of a named screen.
    #[must_use]
    pub fn path_of(&self, screen: Screen) -> Option<&str> {
        self.screens.get(&screen).map(String::as_str)
    }

    /// Declared paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    fn fallback(&self) -> ResolvedRoute {
        self.routes
            .get(FALLBACK_PATH)
            .filter(|route| route.redirect.is_none())
            .map_or_else(ResolvedRoute::home, |route| ResolvedRoute {
                path: FALLBACK_PATH.to_owned(),
                screen: route.screen,
                requires_auth: route.requires_auth,
                requires_admin: route.requires_admin,
            })
    }

    fn flatten(
        &mut self,
        decl: &RouteDecl,
        parent: &str,
        inherited_auth: bool,
        inherited_admin: bool,
    ) -> Result<(), RouteConfigError> {
        let path = join(parent, &decl.path);
        let requires_admin = inherited_admin || decl.requires_admin;
        let requires_auth = inherited_auth || decl.requires_auth || requires_admin;

        let route = FlatRoute {
            screen: decl.name,
            requires_auth,
            requires_admin,
            redirect: decl.redirect.as_deref().map(normalize),
        };

        // A child with an empty path stands in for its parent
        let replaces_parent = decl.path.is_empty() && !parent.is_empty();
        if let Some(previous) = self.routes.insert(path.clone(), route) {
            if !replaces_parent {
                return Err(RouteConfigError::DuplicatePath(path));
            }
            if let Some(screen) = previous.screen {
                self.screens.remove(&screen);
            }
        }

        if let Some(screen) = decl.name {
            if self.screens.insert(screen, path.clone()).is_some() {
                return Err(RouteConfigError::DuplicateScreen(screen));
            }
        }

        for child in &decl.children {
            self.flatten(child, &path, requires_auth, requires_admin)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), RouteConfigError> {
        match self.routes.get(FALLBACK_PATH) {
            Some(route) if route.redirect.is_none() => {}
            _ => return Err(RouteConfigError::MissingFallback),
        }

        for (from, route) in &self.routes {
            if let Some(to) = &route.redirect {
                if !self.routes.contains_key(to) {
                    return Err(RouteConfigError::UnknownRedirect {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The console's route tree.
#[must_use]
pub fn builtin_decls() -> Vec<RouteDecl> {
    vec![
        RouteDecl::leaf("/", Screen::Home),
        RouteDecl::leaf("/login", Screen::Login),
        RouteDecl {
            path: "/app".to_owned(),
            requires_auth: true,
            children: vec![
                RouteDecl {
                    redirect: Some(Screen::Pos.default_path().to_owned()),
                    ..RouteDecl::default()
                },
                RouteDecl::leaf("pos", Screen::Pos),
                RouteDecl {
                    requires_admin: true,
                    ..RouteDecl::leaf("admin", Screen::Admin)
                },
            ],
            ..RouteDecl::default()
        },
    ]
}

/// Canonical form of a requested path.
///
/// Drops the query and fragment, collapses repeated slashes, and removes
/// any trailing slash.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        normalize(child)
    } else {
        normalize(&format!("{parent}/{child}"))
    }
}
