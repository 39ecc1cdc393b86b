//! Navigation driver: resolve, decide, follow redirects until a screen is
//! entered.

use serde::Serialize;

use super::{Decision, FALLBACK_PATH, ResolvedRoute, RouteTable, Screen, decide};
use crate::models::Session;

/// Guard redirects followed before landing on the fallback route.
pub const MAX_HOPS: usize = 8;

/// One guard check made during a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationStep {
    /// Path the route resolved to.
    pub path: String,
    /// What the guard decided for it.
    pub decision: Decision,
}

/// Result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Route finally entered.
    pub destination: ResolvedRoute,
    /// Every guard check, in order.
    pub trail: Vec<NavigationStep>,
}

impl Navigation {
    /// Whether the requested route was entered without a guard redirect.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.trail.len() == 1
    }
}

/// Runs navigations against a route table.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    routes: &'a RouteTable,
}

impl<'a> Navigator<'a> {
    /// Navigator over `routes`.
    #[must_use]
    pub const fn new(routes: &'a RouteTable) -> Self {
        Self { routes }
    }

    /// Navigate to `path` as `session`.
    ///
    /// Guard redirects are followed until a route is entered. A chain
    /// longer than [`MAX_HOPS`] ends on the fallback route.
    #[must_use]
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        let mut trail = Vec::new();
        let mut target = self.routes.resolve(path);

        for _ in 0..=MAX_HOPS {
            let decision = decide(&target, session);
            trail.push(NavigationStep {
                path: target.path.clone(),
                decision,
            });

            let next = match decision {
                Decision::Proceed => {
                    return Navigation {
                        destination: target,
                        trail,
                    };
                }
                Decision::RedirectToLogin => self.screen_path(Screen::Login),
                Decision::RedirectToRoleHome(screen) => self.screen_path(screen),
            };
            target = self.routes.resolve(next);
        }

        tracing::warn!(path = %path, hops = trail.len(), "Navigation did not settle");
        Navigation {
            destination: self.routes.resolve(FALLBACK_PATH),
            trail,
        }
    }

    fn screen_path(&self, screen: Screen) -> &'a str {
        self.routes
            .path_of(screen)
            .unwrap_or_else(|| screen.default_path())
    }
}
