//! Compile-time constant table construction.
//!
//! The table maps symbolic constant names to the exact replacement text an
//! external substitution step will splice into the source. Most entries are
//! hard-coded literals; a few stay live expressions under bundler-ESM builds
//! so downstream bundlers can resolve them against their own mode and
//! tree-shake accordingly.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::descriptor::BuildFlags;
use crate::env::Environment;
use crate::metadata::PackageMetadata;

pub const COMMIT: &str = "__COMMIT__";
pub const VERSION: &str = "__VERSION__";
pub const DEV: &str = "__DEV__";
pub const BROWSER: &str = "__BROWSER__";
pub const GLOBAL: &str = "__GLOBAL__";
pub const ESM_BUNDLER: &str = "__ESM_BUNDLER__";
pub const ESM_BROWSER: &str = "__ESM_BROWSER__";
pub const NODE_JS: &str = "__NODE_JS__";
pub const SSR: &str = "__SSR__";
pub const COMPAT: &str = "__COMPAT__";
pub const FEATURE_SUSPENSE: &str = "__FEATURE_SUSPENSE__";
pub const FEATURE_OPTIONS_API: &str = "__FEATURE_OPTIONS_API__";
pub const FEATURE_PROD_DEVTOOLS: &str = "__FEATURE_PROD_DEVTOOLS__";

/// Constant names an environment variable may override.
pub const DECLARED: &[&str] = &[
    COMMIT,
    VERSION,
    DEV,
    BROWSER,
    GLOBAL,
    ESM_BUNDLER,
    ESM_BROWSER,
    NODE_JS,
    SSR,
    COMPAT,
    FEATURE_SUSPENSE,
    FEATURE_OPTIONS_API,
    FEATURE_PROD_DEVTOOLS,
];

pub fn is_declared(name: &str) -> bool {
    DECLARED.contains(&name)
}

/// One replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    /// A string literal; substituted quoted.
    Str(String),
    /// A boolean literal.
    Bool(bool),
    /// Verbatim source text, left for a downstream bundler to resolve.
    Expr(String),
}

impl ConstantValue {
    /// The exact text the substitution step splices into the source.
    pub fn as_replacement(&self) -> String {
        match self {
            ConstantValue::Str(s) => format!("{:?}", s),
            ConstantValue::Bool(b) => b.to_string(),
            ConstantValue::Expr(e) => e.clone(),
        }
    }
}

impl Serialize for ConstantValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_replacement())
    }
}

/// Ordered constant-name → replacement mapping. Insertion order is the
/// substitution order, so it is part of the deterministic output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable(IndexMap<String, ConstantValue>);

impl ConstantTable {
    pub fn insert(&mut self, name: impl Into<String>, value: ConstantValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstantValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for ConstantTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Build the constant table for one build unit.
///
/// Environment overrides are applied last and win outright - including over
/// the bundler-ESM live-expression forms.
pub fn build(
    flags: &BuildFlags,
    pkg: &PackageMetadata,
    env: &Environment,
    version: &str,
) -> ConstantTable {
    use ConstantValue::{Bool, Expr, Str};

    let browser = (flags.global_build || flags.browser_esm || flags.compat_build)
        && !pkg.build_options.enable_non_browser_branches;

    let mut table = ConstantTable::default();
    table.insert(COMMIT, Str(env.commit.clone()));
    table.insert(VERSION, Str(version.to_string()));

    // Bundler-ESM builds keep a live NODE_ENV check so consuming bundlers
    // can hard-code it per their own mode.
    table.insert(
        DEV,
        if flags.bundler_esm {
            Expr("(process.env.NODE_ENV !== 'production')".to_string())
        } else {
            Bool(!flags.production)
        },
    );

    table.insert(BROWSER, Bool(browser));
    table.insert(GLOBAL, Bool(flags.global_build));
    table.insert(ESM_BUNDLER, Bool(flags.bundler_esm));
    table.insert(ESM_BROWSER, Bool(flags.browser_esm));
    table.insert(NODE_JS, Bool(flags.node_build));
    table.insert(
        SSR,
        Bool(flags.node_build || flags.bundler_esm || flags.server_renderer),
    );
    table.insert(COMPAT, Bool(flags.compat_build));

    table.insert(FEATURE_SUSPENSE, Bool(true));
    table.insert(
        FEATURE_OPTIONS_API,
        if flags.bundler_esm {
            Expr("__APP_OPTIONS_API__".to_string())
        } else {
            Bool(true)
        },
    );
    table.insert(
        FEATURE_PROD_DEVTOOLS,
        if flags.bundler_esm {
            Expr("__APP_PROD_DEVTOOLS__".to_string())
        } else {
            Bool(false)
        },
    );

    // No process object exists in a plain browser module context.
    if flags.browser_esm {
        table.insert("process.env", Expr("({})".to_string()));
        table.insert("process.platform", Expr("\"\"".to_string()));
        table.insert("process.stdout", Expr("null".to_string()));
    }

    for (name, value) in &env.overrides {
        if table.contains(name) {
            table.insert(name.clone(), Expr(value.clone()));
        }
    }

    table
}
