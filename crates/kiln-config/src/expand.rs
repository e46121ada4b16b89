//! Variant expansion.
//!
//! Turns the requested format list and the environment into the full ordered
//! list of build units to emit: baselines first, then the production
//! variants. The list is deterministic for fixed inputs, and an unknown
//! format name aborts the whole run before any descriptor is produced.

use tracing::info;

use crate::descriptor::{BuildUnitDescriptor, Resolver, RunContext};
use crate::error::Result;
use crate::format::FormatKind;

/// Formats built when neither the environment nor the package requests any.
pub const DEFAULT_FORMATS: &[&str] = &["esm-bundler", "cjs"];

/// Requested format names for a run: the environment override if present,
/// else the package's declared formats, else [`DEFAULT_FORMATS`].
pub fn requested_formats(resolver: &Resolver<'_>) -> Result<Vec<FormatKind>> {
    let env = resolver.environment();
    let pkg = resolver.package();

    let names: Vec<&str> = match &env.formats {
        Some(list) => list.iter().map(String::as_str).collect(),
        None if !pkg.build_options.formats.is_empty() => pkg
            .build_options
            .formats
            .iter()
            .map(String::as_str)
            .collect(),
        None => DEFAULT_FORMATS.to_vec(),
    };

    names.iter().map(|name| name.parse()).collect()
}

/// Expand the requested formats into the ordered descriptor list.
///
/// Baselines are skipped entirely under prod-only runs. Under production,
/// each format contributes its production variant after all baselines:
/// commonjs gets an unminified `.prod` build, global and browser-ESM
/// variants (runtime counterparts included) get a minified one. Packages
/// with `prod: false` contribute no production variants at all.
pub fn expand(resolver: &Resolver<'_>) -> Result<Vec<BuildUnitDescriptor>> {
    let formats = requested_formats(resolver)?;
    let env = resolver.environment();
    let pkg = resolver.package();

    let mut run = RunContext::new();
    let mut units = Vec::new();

    if !env.prod_only {
        for &format in &formats {
            units.push(resolver.resolve(format, &mut run));
        }
    }

    if env.production {
        for &format in &formats {
            if !pkg.build_options.prod {
                continue;
            }
            if format.is_cjs() {
                units.push(resolver.resolve_production(format, false, &mut run));
            } else if format.is_global() || format.is_browser_esm() {
                units.push(resolver.resolve_production(format, true, &mut run));
            }
        }
    }

    info!(
        package = %pkg.name,
        formats = formats.len(),
        units = units.len(),
        production = env.production,
        "expanded build matrix"
    );

    Ok(units)
}
