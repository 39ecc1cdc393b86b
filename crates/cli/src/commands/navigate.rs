//! Route commands.
//!
//! # Usage
//!
//! ```bash
//! # Where would /app/admin land for the current session?
//! pos-cli navigate /app/admin
//!
//! # List the route table
//! pos-cli routes
//! ```

use pos_console::{ConsoleState, Decision};

/// Navigate to `path` as the persisted session and report each guard step.
pub fn navigate(state: &ConsoleState, path: &str) {
    let session = state.sessions().session();
    let navigation = state.navigator().navigate(path, &session);

    for step in &navigation.trail {
        match step.decision {
            Decision::Proceed => tracing::info!("{}: proceed", step.path),
            Decision::RedirectToLogin => tracing::info!("{}: redirect to login", step.path),
            Decision::RedirectToRoleHome(screen) => {
                tracing::info!("{}: redirect to {screen} home", step.path);
            }
        }
    }

    let destination = &navigation.destination;
    tracing::info!(
        "Landed on {} ({})",
        destination.path,
        destination.screen.map_or("unnamed", |s| s.as_str())
    );
}

/// List every declared route with its resolved requirements.
pub fn list_routes(state: &ConsoleState) {
    let routes = state.routes();
    for path in routes.paths() {
        let route = routes.resolve(path);
        let access = if route.requires_admin {
            "admin"
        } else if route.requires_auth {
            "signed in"
        } else {
            "public"
        };

        if route.path == path {
            tracing::info!(
                "{path} [{access}] {}",
                route.screen.map_or("", |s| s.as_str())
            );
        } else {
            tracing::info!("{path} -> {}", route.path);
        }
    }
}
