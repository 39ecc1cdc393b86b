//! Core types for the POS console.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod role;

pub use email::{Email, EmailError};
pub use role::{ADMIN_ROLE, DEFAULT_ROLE, RoleSet};
