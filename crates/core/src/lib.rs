//! POS Console Core - Input validation and shared types.
//!
//! This crate provides the pieces shared by every POS console component:
//! - `console` - Session store and route guard
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only pure functions and value types - no I/O, no
//! HTTP clients, no persisted state. Every validator takes the raw field value
//! and returns a verdict; every formatter returns the cleaned value for the
//! caller to store back into the field.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails and role sets
//! - [`validation`] - Field validators and keystroke formatters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
