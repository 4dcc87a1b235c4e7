//! lvsmon - keepalived-style server pool configuration reader
//!
//! This is the main entry point for the lvsmon CLI.

use ariadne::{Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand, ValueEnum};
use lvsmon_config::{Diagnostic, JsonAdapter, LoadError, ParseError, TomlAdapter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// lvsmon - Inspect LVS virtual/real server pool configurations
#[derive(Parser)]
#[command(name = "lvsmon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a configuration file and report problems
    Check {
        /// Path to keepalived.conf
        #[arg(default_value = lvsmon_config::DEFAULT_CONFIG_PATH)]
        config: String,

        /// Fail when the file produced any diagnostic
        #[arg(long)]
        strict: bool,
    },

    /// Print what the reader understood, one line per setting
    Dump {
        /// Path to keepalived.conf, or a .json/.toml export
        #[arg(default_value = lvsmon_config::DEFAULT_CONFIG_PATH)]
        config: String,
    },

    /// Export the parsed model as JSON or TOML
    Export {
        /// Path to keepalived.conf
        #[arg(default_value = lvsmon_config::DEFAULT_CONFIG_PATH)]
        config: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { config, strict } => {
            tracing::info!("Checking config: {}", config);
            let source = lvsmon_config::read_source(&config)?;

            match lvsmon_config::parse(&source) {
                Ok(parsed) => {
                    for diagnostic in &parsed.diagnostics {
                        report_diagnostic(&config, &source, diagnostic)?;
                    }

                    let counts = parsed.config.counts();
                    println!(
                        "Configuration '{}': {} virtual servers, {} real servers, {} health checks, {} diagnostics",
                        config,
                        counts.virtual_servers,
                        counts.real_servers,
                        counts.health_checks,
                        parsed.diagnostics.len()
                    );

                    if strict && !parsed.diagnostics.is_empty() {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    report_parse_error(&config, &source, &e)?;
                    std::process::exit(1);
                }
            }
        }

        Commands::Dump { config } => {
            let parsed = load_or_exit(&config);
            for line in lvsmon_config::render(Some(&parsed.config)) {
                println!("{}", line);
            }
        }

        Commands::Export { config, format } => {
            let parsed = load_or_exit(&config);
            let output = match format {
                Format::Json => JsonAdapter::serialize(&parsed.config)?,
                Format::Toml => TomlAdapter::serialize(&parsed.config)?,
            };
            println!("{}", output);
        }

        Commands::Version => {
            println!("lvsmon v{}", lvsmon_core::VERSION);
        }
    }

    Ok(())
}

/// Load a configuration, exiting with status 1 when nothing could be built
fn load_or_exit(config: &str) -> lvsmon_config::Parsed {
    match lvsmon_config::load_file(config) {
        Ok(parsed) => parsed,
        Err(LoadError::Io { .. }) => std::process::exit(1),
        Err(e) => {
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn report_diagnostic(path: &str, source: &str, diagnostic: &Diagnostic) -> std::io::Result<()> {
    let span = diagnostic.span.range();
    Report::build(ReportKind::Warning, (path, span.clone()))
        .with_message(diagnostic.kind.to_string())
        .with_label(Label::new((path, span)).with_message("value ignored"))
        .finish()
        .eprint((path, Source::from(source)))
}

fn report_parse_error(path: &str, source: &str, error: &ParseError) -> std::io::Result<()> {
    let Some(location) = error.span() else {
        eprintln!("Configuration Error: {}", error);
        return Ok(());
    };

    let label = match error {
        ParseError::UnclosedBlock { .. } => "block opened here is never closed",
        ParseError::UnexpectedBlockClose { .. } => "no block to close",
        ParseError::UnexpectedEof { .. } => "input ends here",
        ParseError::Lex(_) => "unexpected character",
    };

    let span = location.range();
    Report::build(ReportKind::Error, (path, span.clone()))
        .with_message(error.to_string())
        .with_label(Label::new((path, span)).with_message(label))
        .finish()
        .eprint((path, Source::from(source)))
}
