//! lvsmon Core Library
//!
//! This crate provides the in-memory model of a load-balanced server pool:
//! global notification settings, virtual servers, their real servers and
//! health-check methods, plus the record store that keeps server lists
//! ordered and free of duplicate endpoints.

pub mod config;
pub mod error;

pub use error::{Error, Result};

/// lvsmon version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
