//! lvsmon Configuration Reader
//!
//! This crate reads keepalived-style configuration files into the server
//! pool model of `lvsmon-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use lvsmon_config::parse;
//!
//! let source = r#"
//!     virtual_server 10.0.0.1 80 {
//!         real_server 10.0.0.2 80 {
//!             weight 10
//!             TCP_CHECK { connect_timeout 3 }
//!         }
//!     }
//! "#;
//!
//! let parsed = parse(source).unwrap();
//! assert_eq!(parsed.config.virtual_servers.len(), 1);
//! ```

pub mod adapter;
pub mod dump;
pub mod parser;

pub use adapter::{JsonAdapter, TomlAdapter};
pub use dump::{dump, render};
pub use parser::{
    parse, tokenize, Diagnostic, DiagnosticKind, Keyword, LexError, Location, ParseError, Parsed,
    Parser, Tokenizer, Word,
};

use std::path::{Path, PathBuf};

/// Where the daemon looks for its configuration by default
pub const DEFAULT_CONFIG_PATH: &str = "/etc/keepalived/keepalived.conf";

/// Load error
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Can not read the configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Adapter(#[from] lvsmon_core::Error),
}

/// Read a configuration source into memory
pub fn read_source(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "Can not read the configuration file");
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Read and parse a keepalived-style configuration file
///
/// An unreadable file yields no configuration at all. A readable one yields
/// whatever the grammar recognized, plus the non-fatal diagnostics.
pub fn load(path: impl AsRef<Path>) -> Result<Parsed, LoadError> {
    let path = path.as_ref();
    let source = read_source(path)?;

    let parsed = parse(&source).inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to parse configuration");
    })?;

    tracing::info!(
        path = %path.display(),
        virtual_servers = parsed.config.virtual_servers.len(),
        diagnostics = parsed.diagnostics.len(),
        "Configuration loaded"
    );
    dump(Some(&parsed.config));
    Ok(parsed)
}

/// Load a configuration, picking the format from the file extension
///
/// `.json` and `.toml` files hold a serialized model; anything else is read
/// as keepalived.conf.
pub fn load_file(path: impl AsRef<Path>) -> Result<Parsed, LoadError> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => JsonAdapter::parse(&read_source(path)?)?,
        Some("toml") => TomlAdapter::parse(&read_source(path)?)?,
        _ => return load(path),
    };

    Ok(Parsed {
        config,
        diagnostics: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keepalived.conf");

        match load(&path) {
            Err(LoadError::Io { path: reported, source }) => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_file_dispatch() {
        let mut conf = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();
        write!(conf, "virtual_server 10.0.0.1 80 {{ delay_loop 6 }}").unwrap();
        let from_conf = load_file(conf.path()).unwrap();
        assert_eq!(from_conf.config.virtual_servers.len(), 1);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, "{}", JsonAdapter::serialize(&from_conf.config).unwrap()).unwrap();
        let from_json = load_file(json.path()).unwrap();
        assert_eq!(from_json.config, from_conf.config);
    }

    #[test]
    fn test_load_reports_unbalanced_braces() {
        let mut conf = tempfile::NamedTempFile::new().unwrap();
        write!(conf, "global_defs {{ lvs_id A").unwrap();
        assert!(matches!(
            load(conf.path()),
            Err(LoadError::Parse(ParseError::UnclosedBlock { .. }))
        ));
    }
}
