//! Build-unit descriptors and the descriptor factory.
//!
//! A [`BuildUnitDescriptor`] is the complete specification for producing one
//! output artifact from one package under one format/environment
//! combination. The [`Resolver`] assembles descriptors by composing the
//! entry selector, the externalization classifier, and the constant table
//! builder with the environment-derived flags.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::constants::{self, ConstantTable};
use crate::entry::select_entry;
use crate::env::Environment;
use crate::externals;
use crate::format::{FormatKind, ModuleFormat};
use crate::metadata::PackageMetadata;

/// Classification flags for one build unit. Computed once at descriptor
/// creation; nothing downstream re-derives them from the format name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildFlags {
    pub production: bool,
    pub bundler_esm: bool,
    pub browser_esm: bool,
    pub global_build: bool,
    pub node_build: bool,
    pub compat_build: bool,
    pub server_renderer: bool,
}

/// Minifier settings for minified production variants.
///
/// The target language level is pinned and the Safari 10 workarounds stay on
/// for every minified build; only module-aware minification varies by
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinifyOptions {
    /// Module-aware minification for ES module outputs.
    pub module: bool,
    pub ecma: u16,
    pub safari10: bool,
}

impl MinifyOptions {
    pub fn for_format(format: FormatKind) -> Self {
        Self {
            module: format.is_esm(),
            ecma: 2015,
            safari10: true,
        }
    }
}

/// One step of the transform pipeline, in application order. The engine
/// only selects and parameterizes steps; executing them is the sink's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum TransformStep {
    /// Inline imported JSON documents as plain literals.
    InlineJson,
    /// Language compilation (TypeScript down to the target level).
    Compile,
    /// Resolve commonjs-style third-party modules and polyfill platform
    /// built-ins.
    BundleCommonJs,
    /// Apply the descriptor's constant table as source-level substitution.
    SubstituteConstants,
    /// Minify the emitted artifact.
    Minify(MinifyOptions),
}

/// Complete specification for producing one output artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildUnitDescriptor {
    pub format: FormatKind,
    pub file: PathBuf,
    pub module_format: ModuleFormat,
    pub entry: PathBuf,
    /// Module names left unresolved, ordered and deduped.
    pub external: Vec<String>,
    /// Modules the commonjs resolution step must never statically resolve.
    pub cjs_ignore: Vec<String>,
    pub steps: Vec<TransformStep>,
    pub constants: ConstantTable,
    pub flags: BuildFlags,
    pub source_map: bool,
    /// True for at most one descriptor per run.
    pub emit_declarations: bool,
    /// Circular-dependency warnings are suppressed unconditionally; all
    /// other warnings pass through.
    pub suppress_circular_warnings: bool,
    /// Drop whole modules unless at least one exported element is used.
    pub assume_side_effect_free: bool,
}

/// State carried across one expansion run.
///
/// Declarations and their source maps are generated at most once per run no
/// matter how many descriptors are produced. The flag lives here, threaded
/// through explicitly, rather than as ambient process-wide state, so
/// repeated runs in one process stay correct.
#[derive(Debug, Default)]
pub struct RunContext {
    declarations_emitted: bool,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the single declarations-emission slot. Returns true exactly
    /// once per run.
    fn claim_declarations(&mut self) -> bool {
        if self.declarations_emitted {
            false
        } else {
            self.declarations_emitted = true;
            true
        }
    }
}

/// The descriptor factory.
///
/// Holds the per-run inputs; [`Resolver::resolve`] is pure given a
/// [`RunContext`], so identical inputs produce field-for-field identical
/// descriptors.
pub struct Resolver<'a> {
    pkg: &'a PackageMetadata,
    env: &'a Environment,
    /// Root-package version, authoritative for `__VERSION__`.
    version: &'a str,
    /// Dev-dependency names of the template-engine package, for the sfc
    /// compiler's commonjs-ignore list.
    template_engine_deps: &'a [String],
}

impl<'a> Resolver<'a> {
    pub fn new(pkg: &'a PackageMetadata, env: &'a Environment, version: &'a str) -> Self {
        Self {
            pkg,
            env,
            version,
            template_engine_deps: &[],
        }
    }

    pub fn with_template_engine_deps(mut self, deps: &'a [String]) -> Self {
        self.template_engine_deps = deps;
        self
    }

    pub fn package(&self) -> &PackageMetadata {
        self.pkg
    }

    pub fn environment(&self) -> &Environment {
        self.env
    }

    /// Baseline descriptor for one format.
    pub fn resolve(&self, format: FormatKind, run: &mut RunContext) -> BuildUnitDescriptor {
        self.build(format, false, false, run)
    }

    /// Production-suffixed descriptor, optionally minified.
    pub fn resolve_production(
        &self,
        format: FormatKind,
        minify: bool,
        run: &mut RunContext,
    ) -> BuildUnitDescriptor {
        self.build(format, true, minify, run)
    }

    fn build(
        &self,
        format: FormatKind,
        prod_suffix: bool,
        minify: bool,
        run: &mut RunContext,
    ) -> BuildUnitDescriptor {
        let options = &self.pkg.build_options;
        let file = format.output_file(self.pkg.filename(), prod_suffix);

        // Production is signalled by the environment forcing __DEV__ off or
        // by the output file carrying the production suffix.
        let production = self.env.dev_forced_off()
            || file
                .to_str()
                .is_some_and(|f| f.ends_with(".prod.js"));

        let flags = BuildFlags {
            production,
            bundler_esm: format.is_bundler_esm(),
            browser_esm: format.is_browser_esm(),
            global_build: format.is_global(),
            node_build: format.is_cjs(),
            compat_build: options.compat,
            server_renderer: self.pkg.is_server_renderer(),
        };

        let emit_declarations = self.pkg.types.is_some()
            && self.env.emit_types
            && run.claim_declarations();

        let has_dev_deps = !self.pkg.dev_dependencies.is_empty();
        let bundle_commonjs =
            (format.is_cjs() && has_dev_deps) || options.enable_non_browser_branches;

        let mut steps = vec![TransformStep::InlineJson, TransformStep::Compile];
        if bundle_commonjs {
            steps.push(TransformStep::BundleCommonJs);
        }
        steps.push(TransformStep::SubstituteConstants);
        if minify {
            steps.push(TransformStep::Minify(MinifyOptions::for_format(format)));
        }

        debug!(
            package = %self.pkg.name,
            format = %format,
            file = %file.display(),
            production,
            emit_declarations,
            "resolved build unit"
        );

        BuildUnitDescriptor {
            format,
            file,
            module_format: format.module_format(),
            entry: select_entry(format, options.compat),
            external: externals::classify(&flags, self.pkg),
            cjs_ignore: externals::cjs_ignore(self.pkg, self.template_engine_deps),
            steps,
            constants: constants::build(&flags, self.pkg, self.env, self.version),
            flags,
            source_map: self.env.source_map,
            emit_declarations,
            suppress_circular_warnings: true,
            assume_side_effect_free: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let mut vars = vec![("TARGET".to_string(), "core".to_string())];
        vars.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Environment::from_vars(vars).unwrap()
    }

    fn pkg() -> PackageMetadata {
        PackageMetadata::from_value(json!({
            "name": "@kiln/core",
            "types": "dist/core.d.ts",
            "dependencies": { "@kiln/shared": "3.2.0" },
            "devDependencies": { "typescript": "^5.0" },
            "buildOptions": { "name": "Kiln", "formats": ["esm-bundler", "cjs", "global"] }
        }))
        .unwrap()
    }

    #[test]
    fn baseline_cjs_descriptor() {
        let p = pkg();
        let e = env(&[]);
        let resolver = Resolver::new(&p, &e, "3.2.0");
        let mut run = RunContext::new();

        let unit = resolver.resolve(FormatKind::Cjs, &mut run);
        assert_eq!(unit.file, PathBuf::from("dist/core.cjs.js"));
        assert_eq!(unit.module_format, ModuleFormat::Cjs);
        assert_eq!(unit.entry, PathBuf::from("src/index.ts"));
        assert!(unit.flags.node_build);
        assert!(!unit.flags.production);
        assert!(!unit.flags.global_build);
        assert_eq!(
            unit.steps,
            [
                TransformStep::InlineJson,
                TransformStep::Compile,
                TransformStep::BundleCommonJs,
                TransformStep::SubstituteConstants,
            ]
        );
        assert!(unit.suppress_circular_warnings);
        assert!(unit.assume_side_effect_free);
    }

    #[test]
    fn prod_suffix_marks_production() {
        let p = pkg();
        let e = env(&[]);
        let resolver = Resolver::new(&p, &e, "3.2.0");
        let mut run = RunContext::new();

        let unit = resolver.resolve_production(FormatKind::Global, true, &mut run);
        assert_eq!(unit.file, PathBuf::from("dist/core.global.prod.js"));
        assert!(unit.flags.production);
        assert_eq!(
            unit.steps.last(),
            Some(&TransformStep::Minify(MinifyOptions {
                module: false,
                ecma: 2015,
                safari10: true,
            }))
        );
    }

    #[test]
    fn dev_override_forces_production() {
        let p = pkg();
        let e = env(&[("__DEV__", "false")]);
        let resolver = Resolver::new(&p, &e, "3.2.0");
        let mut run = RunContext::new();

        let unit = resolver.resolve(FormatKind::EsmBrowser, &mut run);
        assert!(unit.flags.production);
    }

    #[test]
    fn declarations_claimed_once_per_run() {
        let p = pkg();
        let e = env(&[("TYPES", "1")]);
        let resolver = Resolver::new(&p, &e, "3.2.0");
        let mut run = RunContext::new();

        let first = resolver.resolve(FormatKind::EsmBundler, &mut run);
        let second = resolver.resolve(FormatKind::Cjs, &mut run);
        assert!(first.emit_declarations);
        assert!(!second.emit_declarations);

        // A fresh run gets a fresh slot.
        let mut next_run = RunContext::new();
        assert!(resolver.resolve(FormatKind::Cjs, &mut next_run).emit_declarations);
    }

    #[test]
    fn global_and_node_are_mutually_exclusive() {
        let p = pkg();
        let e = env(&[]);
        let resolver = Resolver::new(&p, &e, "3.2.0");
        let mut run = RunContext::new();

        for &format in FormatKind::ALL {
            let unit = resolver.resolve(format, &mut run);
            assert!(!(unit.flags.global_build && unit.flags.node_build));
        }
    }

    #[test]
    fn browser_global_skips_commonjs_bundling() {
        let p = pkg();
        let e = env(&[]);
        let resolver = Resolver::new(&p, &e, "3.2.0");
        let mut run = RunContext::new();

        let unit = resolver.resolve(FormatKind::Global, &mut run);
        assert!(!unit.steps.contains(&TransformStep::BundleCommonJs));
    }

    #[test]
    fn resolution_is_idempotent() {
        let p = pkg();
        let e = env(&[("NODE_ENV", "production"), ("SOURCE_MAP", "1")]);
        let resolver = Resolver::new(&p, &e, "3.2.0");

        let a = resolver.resolve(FormatKind::EsmBundler, &mut RunContext::new());
        let b = resolver.resolve(FormatKind::EsmBundler, &mut RunContext::new());
        assert_eq!(a, b);
    }
}
