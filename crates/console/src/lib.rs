//! POS console access control.
//!
//! Sign-in, the persisted session, and the guard that decides where each
//! navigation lands.
//!
//! # Modules
//!
//! - `api` - Login exchange with the back-office API
//! - `config` - Configuration loaded from environment variables
//! - `models` - Session and credential types
//! - `routes` - Route table, guard and navigator
//! - `services` - The session store
//! - `state` - Shared console state
//! - `storage` - Durable session storage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

pub use config::{ConfigError, ConsoleConfig};
pub use error::ConsoleError;
pub use models::{Credentials, Session};
pub use routes::{Decision, Navigator, ResolvedRoute, RouteTable, Screen, decide};
pub use services::auth::{AuthError, SessionStore};
pub use state::ConsoleState;
