//! cookman - domain-scoped cookie management core
//!
//! This crate provides the non-UI core of a browser cookie manager:
//! resolving the candidate domain scopes for a hostname, normalizing edit
//! forms into store-ready cookie records, and reconciling edits and
//! deletions against a pluggable cookie store.

pub mod cookie;
pub mod error;
pub mod i18n;
pub mod ipc;
pub mod logging;
pub mod manager;
pub mod scope;
pub mod store;

pub use error::{CookmanError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
