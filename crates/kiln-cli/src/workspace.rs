//! Monorepo metadata loading.
//!
//! The resolution engine takes plain values; this module does the disk work:
//! the target package's manifest under `packages/`, the root manifest for
//! the authoritative version, and the template-engine package's manifest for
//! the sfc compiler's commonjs-ignore list.

use std::fs;
use std::path::{Path, PathBuf};

use kiln_config::PackageMetadata;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CliError, Result};

pub struct Monorepo {
    root: PathBuf,
}

impl Monorepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load `packages/<target>/package.json`.
    pub fn load_package(&self, target: &str) -> Result<PackageMetadata> {
        let path = self.root.join("packages").join(target).join("package.json");
        self.read_manifest(&path)
    }

    /// Version of the root manifest, authoritative for `__VERSION__`.
    pub fn root_version(&self) -> Result<String> {
        let path = self.root.join("package.json");
        let value = self.read_value(&path)?;
        match value.get("version").and_then(Value::as_str) {
            Some(version) => Ok(version.to_string()),
            None => {
                warn!(path = %path.display(), "root manifest has no version field");
                Ok("0.0.0".to_string())
            }
        }
    }

    /// Dev-dependency names of the template-engine package, for the sfc
    /// compiler's commonjs-ignore list. Best effort: a missing or
    /// unreadable manifest degrades to an empty list with a warning, since
    /// the ignore list only silences static resolution of optional engines.
    pub fn template_engine_deps(&self, pkg: &PackageMetadata) -> Vec<String> {
        if !pkg.is_sfc_compiler() {
            return Vec::new();
        }

        let Some(engine) = pkg
            .dependency_names()
            .find(|name| name.ends_with("/consolidate") || *name == "consolidate")
        else {
            warn!("sfc compiler declares no template-engine dependency");
            return Vec::new();
        };

        let path = self
            .root
            .join("node_modules")
            .join(engine)
            .join("package.json");
        match self.read_manifest(&path) {
            Ok(manifest) => {
                debug!(engine, path = %path.display(), "loaded template-engine manifest");
                manifest.dev_dependency_names().map(str::to_string).collect()
            }
            Err(err) => {
                warn!(engine, %err, "template-engine manifest unavailable");
                Vec::new()
            }
        }
    }

    fn read_manifest(&self, path: &Path) -> Result<PackageMetadata> {
        let value = self.read_value(path)?;
        PackageMetadata::from_value(value).map_err(|source| CliError::InvalidManifest {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_value(&self, path: &Path) -> Result<Value> {
        let text = fs::read_to_string(path)
            .map_err(|_| CliError::ManifestNotFound(path.to_path_buf()))?;
        serde_json::from_str(&text).map_err(|source| CliError::InvalidManifest {
            path: path.to_path_buf(),
            source,
        })
    }
}
