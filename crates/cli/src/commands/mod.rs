//! CLI command implementations.

pub mod fields;
pub mod navigate;
pub mod session;
