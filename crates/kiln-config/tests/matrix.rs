//! End-to-end tests for build-matrix expansion.

use kiln_config::{
    expand, ConfigError, ConstantValue, Environment, FormatKind, PackageMetadata, Resolver,
    TransformStep,
};
use serde_json::json;

fn environment(pairs: &[(&str, &str)]) -> Environment {
    let mut vars = vec![("TARGET".to_string(), "core".to_string())];
    vars.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Environment::from_vars(vars).expect("environment")
}

fn core_package() -> PackageMetadata {
    PackageMetadata::from_value(json!({
        "name": "@kiln/core",
        "types": "dist/core.d.ts",
        "dependencies": { "@kiln/shared": "3.2.0" },
        "peerDependencies": { "postcss": "^8.0" },
        "devDependencies": { "typescript": "^5.0" },
        "buildOptions": {
            "name": "Kiln",
            "formats": [
                "esm-bundler",
                "esm-browser",
                "cjs",
                "global",
                "esm-bundler-runtime",
                "esm-browser-runtime",
                "global-runtime"
            ]
        }
    }))
    .expect("package metadata")
}

#[test]
fn one_baseline_per_format_with_unique_paths() {
    let pkg = core_package();
    let env = environment(&[]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let units = expand(&resolver).expect("expand");
    assert_eq!(units.len(), 7);

    let mut files: Vec<_> = units.iter().map(|u| u.file.clone()).collect();
    files.sort();
    files.dedup();
    assert_eq!(files.len(), 7, "output paths must be unique");
}

#[test]
fn declarations_emitted_at_most_once_per_run() {
    let pkg = core_package();
    let env = environment(&[("TYPES", "1"), ("NODE_ENV", "production")]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let units = expand(&resolver).expect("expand");
    assert!(units.len() > 7, "production variants expected");
    let emitting = units.iter().filter(|u| u.emit_declarations).count();
    assert_eq!(emitting, 1);
    assert!(units[0].emit_declarations, "first descriptor claims the slot");
}

#[test]
fn production_expansion_order() {
    let pkg = PackageMetadata::from_value(json!({
        "name": "@kiln/core",
        "buildOptions": { "name": "Kiln" }
    }))
    .expect("package metadata");
    let env = environment(&[("FORMATS", "cjs,global"), ("NODE_ENV", "production")]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let units = expand(&resolver).expect("expand");
    let files: Vec<_> = units.iter().map(|u| u.file.display().to_string()).collect();
    assert_eq!(
        files,
        [
            "dist/core.cjs.js",
            "dist/core.global.js",
            "dist/core.cjs.prod.js",
            "dist/core.global.prod.js",
        ]
    );

    // Production cjs stays unminified; production global is minified.
    let prod_cjs = &units[2];
    let prod_global = &units[3];
    assert!(!prod_cjs
        .steps
        .iter()
        .any(|s| matches!(s, TransformStep::Minify(_))));
    assert!(matches!(
        prod_global.steps.last(),
        Some(TransformStep::Minify(opts)) if !opts.module && opts.ecma == 2015 && opts.safari10
    ));
    assert!(prod_global.flags.production);
}

#[test]
fn externals_per_format_category() {
    let pkg = core_package();
    let env = environment(&[]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let units = expand(&resolver).expect("expand");
    let global = units
        .iter()
        .find(|u| u.format == FormatKind::Global)
        .expect("global unit");
    assert_eq!(
        global.external,
        [
            "source-map-js",
            "@babel/parser",
            "estree-walker",
            "entities/lib/decode.js"
        ]
    );

    let cjs = units
        .iter()
        .find(|u| u.format == FormatKind::Cjs)
        .expect("cjs unit");
    assert_eq!(
        cjs.external,
        ["@kiln/shared", "postcss", "path", "url", "stream"]
    );
}

#[test]
fn constant_override_applies_to_every_unit() {
    let pkg = core_package();
    let env = environment(&[("__FEATURE_OPTIONS_API__", "false")]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let units = expand(&resolver).expect("expand");
    for unit in &units {
        assert_eq!(
            unit.constants.get("__FEATURE_OPTIONS_API__"),
            Some(&ConstantValue::Expr("false".into())),
            "override must win for {}",
            unit.format
        );
    }
}

#[test]
fn unknown_format_yields_zero_descriptors() {
    let pkg = core_package();
    let env = environment(&[("FORMATS", "bogus-format")]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let err = expand(&resolver).expect_err("must fail");
    assert!(matches!(err, ConfigError::UnknownFormat(name) if name == "bogus-format"));
}

#[test]
fn expansion_is_deterministic() {
    let pkg = core_package();
    let env = environment(&[("NODE_ENV", "production"), ("TYPES", "1"), ("COMMIT", "abc1234")]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let first = expand(&resolver).expect("expand");
    let second = expand(&resolver).expect("expand");
    assert_eq!(first, second);
}

#[test]
fn compat_package_uses_esm_entries_and_suppression_set() {
    let pkg = PackageMetadata::from_value(json!({
        "name": "@kiln/compat",
        "buildOptions": {
            "name": "Kiln",
            "filename": "kiln-compat",
            "compat": true,
            "formats": ["esm-bundler", "cjs"]
        }
    }))
    .expect("package metadata");
    let env = environment(&[]);
    let resolver = Resolver::new(&pkg, &env, "3.2.0");

    let units = expand(&resolver).expect("expand");
    let esm = &units[0];
    assert_eq!(esm.entry.display().to_string(), "src/esm-index.ts");
    assert!(esm.flags.compat_build);
    // Compat builds are browser builds for externalization purposes.
    assert_eq!(esm.external, [
        "source-map-js",
        "@babel/parser",
        "estree-walker",
        "entities/lib/decode.js"
    ]);

    let cjs = &units[1];
    assert_eq!(cjs.entry.display().to_string(), "src/index.ts");
}
