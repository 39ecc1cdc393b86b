//! Domain models for the console.

pub mod session;

pub use session::{Credentials, Session, keys as session_keys};
