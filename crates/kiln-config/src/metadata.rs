//! Package metadata types.
//!
//! These are deserialized straight from a package's `package.json`. Only the
//! fields the resolver consults are modeled; everything else in the manifest
//! is ignored. Loading from disk is the caller's job - the engine never
//! touches the filesystem.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// The slice of `package.json` the resolution engine cares about.
///
/// Dependency maps keep only their key sets semantically; the version
/// requirement strings are carried but never inspected. `BTreeMap` keeps
/// name iteration order deterministic regardless of manifest key order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Path to the type-declarations entry point, if the package ships one.
    #[serde(default)]
    pub types: Option<String>,

    #[serde(default)]
    pub build_options: BuildOptions,
}

/// The `buildOptions` record of a package manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// Global export name for IIFE builds.
    #[serde(default)]
    pub name: Option<String>,

    /// Output file stem override. Defaults to the unscoped package name.
    #[serde(default)]
    pub filename: Option<String>,

    /// Format names this package builds by default. Overridable per run
    /// via the environment's format list.
    #[serde(default)]
    pub formats: Vec<String>,

    /// `false` opts the package out of production variants entirely.
    #[serde(default = "default_true")]
    pub prod: bool,

    /// Compat packages must expose both a default export and named exports,
    /// which requires dedicated ESM entry files.
    #[serde(default)]
    pub compat: bool,

    /// When set, non-browser code paths are kept and node-style dependency
    /// bundling is enabled even for browser formats.
    #[serde(default)]
    pub enable_non_browser_branches: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            name: None,
            filename: None,
            formats: Vec::new(),
            prod: true,
            compat: false,
            enable_non_browser_branches: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl PackageMetadata {
    /// Create from an already-parsed `serde_json::Value`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Package name with any `@scope/` prefix stripped.
    pub fn unscoped_name(&self) -> &str {
        match self.name.rsplit_once('/') {
            Some((_, bare)) => bare,
            None => &self.name,
        }
    }

    /// Output file stem for this package.
    pub fn filename(&self) -> &str {
        self.build_options
            .filename
            .as_deref()
            .unwrap_or_else(|| self.unscoped_name())
    }

    /// The server-rendering package gets SSR support unconditionally.
    pub fn is_server_renderer(&self) -> bool {
        self.unscoped_name().contains("server-renderer")
    }

    /// The single-file-component compiler needs a commonjs-ignore list for
    /// the template engines it requires dynamically.
    pub fn is_sfc_compiler(&self) -> bool {
        self.unscoped_name() == "compiler-sfc"
    }

    /// Names of declared runtime dependencies, in deterministic order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str)
    }

    /// Names of declared peer dependencies, in deterministic order.
    pub fn peer_dependency_names(&self) -> impl Iterator<Item = &str> {
        self.peer_dependencies.keys().map(String::as_str)
    }

    /// Names of declared dev dependencies, in deterministic order.
    pub fn dev_dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dev_dependencies.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_parses_manifest() {
        let pkg = PackageMetadata::from_value(json!({
            "name": "@kiln/runtime-dom",
            "version": "3.2.0",
            "dependencies": { "@kiln/shared": "3.2.0" },
            "types": "dist/runtime-dom.d.ts",
            "buildOptions": {
                "name": "KilnDOM",
                "formats": ["esm-bundler", "cjs", "global"]
            }
        }))
        .unwrap();

        assert_eq!(pkg.unscoped_name(), "runtime-dom");
        assert_eq!(pkg.filename(), "runtime-dom");
        assert_eq!(pkg.build_options.name.as_deref(), Some("KilnDOM"));
        assert!(pkg.build_options.prod);
        assert!(!pkg.build_options.compat);
    }

    #[test]
    fn filename_override_wins() {
        let pkg = PackageMetadata::from_value(json!({
            "name": "@kiln/compat",
            "buildOptions": { "filename": "kiln-compat", "compat": true }
        }))
        .unwrap();

        assert_eq!(pkg.filename(), "kiln-compat");
        assert!(pkg.build_options.compat);
    }

    #[test]
    fn prod_opt_out_deserializes() {
        let pkg = PackageMetadata::from_value(json!({
            "name": "@kiln/template-explorer",
            "buildOptions": { "prod": false }
        }))
        .unwrap();

        assert!(!pkg.build_options.prod);
    }

    #[test]
    fn special_package_detection() {
        let sfc = PackageMetadata {
            name: "@kiln/compiler-sfc".into(),
            ..Default::default()
        };
        let ssr = PackageMetadata {
            name: "@kiln/server-renderer".into(),
            ..Default::default()
        };

        assert!(sfc.is_sfc_compiler());
        assert!(!sfc.is_server_renderer());
        assert!(ssr.is_server_renderer());
        assert!(!ssr.is_sfc_compiler());
    }
}
