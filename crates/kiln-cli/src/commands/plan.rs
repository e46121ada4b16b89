//! Plan command implementation.
//!
//! Resolves the environment (process variables merged with flag overrides),
//! loads the target package, expands the build matrix, and emits the
//! descriptor list as JSON for the downstream compile/bundle/emit pipeline.

use std::fs;

use kiln_config::{expand, Environment, Resolver};
use tracing::info;

use crate::cli::PlanArgs;
use crate::error::Result;
use crate::workspace::Monorepo;

pub fn execute(args: PlanArgs) -> Result<()> {
    let env = resolve_environment(&args)?;
    let repo = Monorepo::new(&args.root);

    let pkg = repo.load_package(&env.target)?;
    let version = repo.root_version()?;
    let template_deps = repo.template_engine_deps(&pkg);

    let resolver =
        Resolver::new(&pkg, &env, &version).with_template_engine_deps(&template_deps);
    let units = expand(&resolver)?;

    let plan = serde_json::to_string_pretty(&units)?;
    match &args.output {
        Some(path) => {
            fs::write(path, plan)?;
            info!(units = units.len(), path = %path.display(), "plan written");
        }
        None => println!("{plan}"),
    }

    Ok(())
}

/// Build the run environment: process variables first, flags override.
fn resolve_environment(args: &PlanArgs) -> Result<Environment> {
    let mut vars: Vec<(String, String)> = std::env::vars().collect();
    let mut set = |name: &str, value: String| {
        vars.retain(|(k, _)| k != name);
        vars.push((name.to_string(), value));
    };

    if let Some(target) = &args.target {
        set(kiln_config::env::TARGET, target.clone());
    }
    if let Some(formats) = &args.formats {
        set(kiln_config::env::FORMATS, formats.clone());
    }
    if args.production {
        set(kiln_config::env::NODE_ENV, "production".to_string());
    }
    if args.prod_only {
        set(kiln_config::env::PROD_ONLY, "1".to_string());
    }
    if args.source_map {
        set(kiln_config::env::SOURCE_MAP, "1".to_string());
    }
    if args.types {
        set(kiln_config::env::TYPES, "1".to_string());
    }
    if let Some(commit) = &args.commit {
        set(kiln_config::env::COMMIT, commit.clone());
    }

    Ok(Environment::from_vars(vars)?)
}
