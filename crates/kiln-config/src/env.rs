//! Build environment resolved once at startup.
//!
//! The environment is captured from process variables exactly once and never
//! mutated afterwards. Parsing takes an iterator of pairs rather than reading
//! `std::env` directly so tests never touch the real process environment.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::constants;
use crate::error::{ConfigError, Result};

/// Variables understood by the engine. Anything else whose name matches a
/// declared constant becomes a constant override.
pub const TARGET: &str = "TARGET";
pub const FORMATS: &str = "FORMATS";
pub const NODE_ENV: &str = "NODE_ENV";
pub const PROD_ONLY: &str = "PROD_ONLY";
pub const SOURCE_MAP: &str = "SOURCE_MAP";
pub const TYPES: &str = "TYPES";
pub const COMMIT: &str = "COMMIT";

/// Immutable per-run environment.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Package selected for this run.
    pub target: String,

    /// Requested format names, if the run overrides the package defaults.
    /// Kept as raw strings so the unknown-format error can carry the
    /// offending name.
    pub formats: Option<Vec<String>>,

    /// `NODE_ENV=production`: expand production variants.
    pub production: bool,

    /// Skip the baseline (development) descriptors entirely.
    pub prod_only: bool,

    /// Emit source maps alongside each artifact.
    pub source_map: bool,

    /// Emit type declarations (once per run, see the descriptor factory).
    pub emit_types: bool,

    /// Commit identifier substituted as `__COMMIT__`.
    pub commit: String,

    /// Constant overrides: any variable named after a declared constant,
    /// captured verbatim. Applied last when a constant table is built.
    pub overrides: FxHashMap<String, String>,
}

impl Environment {
    /// Resolve the environment from an iterator of `(name, value)` pairs.
    ///
    /// A missing or empty `TARGET` is the fatal startup misconfiguration;
    /// everything else has a default.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map: FxHashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let target = map
            .remove(TARGET)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingTarget)?;

        let formats = map.remove(FORMATS).map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        });

        let production = map.get(NODE_ENV).is_some_and(|v| v.as_str() == "production");
        let prod_only = map.get(PROD_ONLY).is_some_and(|v| !v.is_empty());
        let source_map = map.get(SOURCE_MAP).is_some_and(|v| !v.is_empty());
        let emit_types = map.contains_key(TYPES);
        let commit = map.remove(COMMIT).unwrap_or_else(|| "dev".to_string());

        let overrides: FxHashMap<String, String> = map
            .into_iter()
            .filter(|(name, _)| constants::is_declared(name))
            .collect();

        for (name, value) in &overrides {
            debug!(constant = %name, %value, "constant override from environment");
        }

        Ok(Self {
            target,
            formats,
            production,
            prod_only,
            source_map,
            emit_types,
            commit,
            overrides,
        })
    }

    /// Whether the `__DEV__` constant is forced off for this run.
    pub fn dev_forced_off(&self) -> bool {
        self.overrides
            .get(constants::DEV)
            .is_some_and(|v| v.as_str() == "false")
    }
}
