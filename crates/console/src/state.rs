//! Console state shared by every caller.

use std::sync::Arc;

use crate::api::HttpAuthenticator;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::routes::{Navigator, RouteTable};
use crate::services::auth::{JwtClaimsDecoder, SessionStore};
use crate::storage::FileStorage;

/// Console state: configuration, routes and the session store.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct ConsoleState {
    inner: Arc<ConsoleStateInner>,
}

struct ConsoleStateInner {
    config: ConsoleConfig,
    routes: RouteTable,
    sessions: SessionStore<HttpAuthenticator>,
}

impl ConsoleState {
    /// Wire up the console from `config`, restoring any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the route file is invalid or the API client
    /// cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let routes = config.load_routes()?;
        let authenticator = HttpAuthenticator::new(&config.api_base_url, config.http_timeout)?;
        let sessions = SessionStore::restore(
            authenticator,
            Box::new(JwtClaimsDecoder::new(config.role_claim.clone())),
            Box::new(FileStorage::new(config.session_file.clone())),
        );

        tracing::debug!(
            api = %config.api_base_url,
            session_file = %config.session_file.display(),
            signed_in = sessions.is_authenticated(),
            "Console state ready"
        );

        Ok(Self {
            inner: Arc::new(ConsoleStateInner {
                config,
                routes,
                sessions,
            }),
        })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Get the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    /// Get the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore<HttpAuthenticator> {
        &self.inner.sessions
    }

    /// Navigator over the route table.
    #[must_use]
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.inner.routes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::routes::Screen;

    fn config(session_file: PathBuf) -> ConsoleConfig {
        ConsoleConfig {
            api_base_url: Url::parse("http://127.0.0.1:9/").unwrap(),
            session_file,
            routes_file: None,
            role_claim: "roles".to_string(),
            http_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_restores_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"token":"tok","userEmail":"a@b.c","userRoles":"[\"Admin\"]"}"#,
        )
        .unwrap();

        let state = ConsoleState::new(config(path)).unwrap();
        assert!(state.sessions().is_admin());

        let session = state.sessions().session();
        let nav = state.navigator().navigate("/login", &session);
        assert_eq!(nav.destination.screen, Some(Screen::Admin));
    }

    #[test]
    fn test_clones_share_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = ConsoleState::new(config(dir.path().join("session.json"))).unwrap();
        let clone = state.clone();
        assert!(!clone.sessions().is_authenticated());
        assert_eq!(clone.config().role_claim, "roles");
        assert!(std::ptr::eq(state.routes(), clone.routes()));
    }
}
