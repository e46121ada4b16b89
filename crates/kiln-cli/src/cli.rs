//! Command-line interface definition.
//!
//! Every plan input can come from the process environment (`TARGET`,
//! `FORMATS`, `NODE_ENV`, ...) as CI scripts expect, with the flags below as
//! explicit overrides.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// kiln - build-matrix planner for multi-package source trees
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Resolve a package's build matrix into build-unit descriptors",
    long_about = "kiln turns a (package, formats, environment) selection into a \
                  deterministic list of build-unit descriptors: entry file, output \
                  path, externals, transform steps, and compile-time constants, \
                  ready for a downstream compile/bundle/emit pipeline."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available kiln subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the build matrix and print it as JSON
    ///
    /// Loads the target package's manifest, expands the requested formats
    /// under the current environment, and writes one descriptor per build
    /// unit for the downstream emit pipeline to consume.
    Plan(PlanArgs),
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Target package to plan (overrides the TARGET variable)
    ///
    /// The package is looked up at `<root>/packages/<target>/package.json`.
    #[arg(short, long, value_name = "PACKAGE")]
    pub target: Option<String>,

    /// Comma-separated format list (overrides FORMATS)
    ///
    /// Known formats: esm-bundler, esm-browser, cjs, global, and the
    /// runtime-only variants esm-bundler-runtime, esm-browser-runtime,
    /// global-runtime.
    #[arg(short, long, value_name = "LIST")]
    pub formats: Option<String>,

    /// Expand production variants (same as NODE_ENV=production)
    #[arg(long)]
    pub production: bool,

    /// Skip the baseline development descriptors (same as PROD_ONLY=1)
    #[arg(long)]
    pub prod_only: bool,

    /// Emit source maps alongside each artifact (same as SOURCE_MAP=1)
    #[arg(long)]
    pub source_map: bool,

    /// Emit type declarations, once per run (same as TYPES=1)
    #[arg(long)]
    pub types: bool,

    /// Commit identifier substituted as __COMMIT__ (overrides COMMIT)
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Monorepo root directory
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Write the plan to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
