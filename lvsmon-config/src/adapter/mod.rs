//! Configuration adapters
//!
//! Serde-based formats for exporting a parsed configuration and reading it
//! back.

mod json;
mod toml;

pub use json::JsonAdapter;
pub use self::toml::TomlAdapter;
