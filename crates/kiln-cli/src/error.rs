//! CLI error types and miette conversion.

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Errors from the resolution engine (missing target, unknown format).
    #[error(transparent)]
    Config(#[from] kiln_config::ConfigError),

    #[error("package manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("invalid package manifest at {}: {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert CliError to a miette Report with a usage hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match &err {
        CliError::Config(kiln_config::ConfigError::MissingTarget) => miette::miette!(
            help = "run `kiln plan --target <package>` or export TARGET=<package>",
            "{err}"
        ),
        CliError::Config(kiln_config::ConfigError::UnknownFormat(_)) => miette::miette!(
            help = "known formats: esm-bundler, esm-browser, cjs, global, \
                    esm-bundler-runtime, esm-browser-runtime, global-runtime",
            "{err}"
        ),
        CliError::ManifestNotFound(_) => miette::miette!(
            help = "expected <root>/packages/<target>/package.json; check --root and --target",
            "{err}"
        ),
        _ => miette::miette!("{err}"),
    }
}
