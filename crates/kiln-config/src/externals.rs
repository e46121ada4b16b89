//! Externalization classification.
//!
//! Decides which module names a build unit leaves unresolved, to be supplied
//! by the consumer's module system at load time, versus inlining into the
//! artifact.

use crate::descriptor::BuildFlags;
use crate::metadata::PackageMetadata;

/// Modules referenced only from non-browser branches. Their imports are
/// tree-shaken out of browser artifacts; listing them as external silences
/// unresolved-import warnings in the meantime.
pub const BROWSER_SUPPRESSION_LIST: &[&str] = &[
    "source-map-js",
    "@babel/parser",
    "estree-walker",
    "entities/lib/decode.js",
];

/// Platform built-ins needed by the node-facing packages.
pub const NODE_BUILTINS: &[&str] = &["path", "url", "stream"];

/// Modules the sfc compiler requires dynamically; static resolution of these
/// must never be attempted.
const DYNAMIC_REQUIRES: &[&str] = &[
    "vm",
    "crypto",
    "react-dom/server",
    "teacup/lib/express",
    "arc-templates/dist/es5",
    "then-pug",
    "then-jade",
];

/// Module names to treat as external for one build unit.
///
/// Browser-facing builds (global, browser-ESM, or compat) inline everything;
/// the suppression list is returned only when the package keeps no
/// non-browser branches. All other builds externalize every declared runtime
/// and peer dependency plus the platform built-ins.
pub fn classify(flags: &BuildFlags, pkg: &PackageMetadata) -> Vec<String> {
    if flags.global_build || flags.browser_esm || flags.compat_build {
        if pkg.build_options.enable_non_browser_branches {
            Vec::new()
        } else {
            BROWSER_SUPPRESSION_LIST
                .iter()
                .map(|m| m.to_string())
                .collect()
        }
    } else {
        let mut external: Vec<String> = Vec::new();
        for name in pkg
            .dependency_names()
            .chain(pkg.peer_dependency_names())
            .chain(NODE_BUILTINS.iter().copied())
        {
            if !external.iter().any(|e| e == name) {
                external.push(name.to_string());
            }
        }
        external
    }
}

/// Commonjs-ignore list for the sfc compiler: the template engines its
/// optional integration supports (read from the template-engine package's
/// dev dependencies, supplied by the caller) plus the fixed dynamic-require
/// list. Empty for every other package.
pub fn cjs_ignore(pkg: &PackageMetadata, template_engine_deps: &[String]) -> Vec<String> {
    if !pkg.is_sfc_compiler() {
        return Vec::new();
    }

    template_engine_deps
        .iter()
        .map(String::as_str)
        .chain(DYNAMIC_REQUIRES.iter().copied())
        .map(str::to_string)
        .collect()
}
