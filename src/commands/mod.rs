pub mod compile;
pub mod debug_mode;
pub mod env;
pub mod unlink;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::config::env::EnvSnapshot;
use crate::config::options::{BuildOptions, ResolvedBuild};
use crate::config::package::PackageDescriptor;
use crate::config::{CepConfig, get_config};
use crate::error::CepBundlerError;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
///
/// Resolves the build options and the layered configuration so that each
/// command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Build options with every default applied.
    pub build: ResolvedBuild,
    /// Configuration resolved from the environment and `package.json`.
    pub config: CepConfig,
    /// The environment the configuration was resolved against.
    pub env: EnvSnapshot,
    /// Platform the command runs on.
    pub platform: Platform,
}

impl CommandSetup {
    /// Apply option defaults, read `package.json`, and resolve the
    /// configuration against `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor cannot be read or a setting is malformed.
    pub fn init(
        opts: BuildOptions,
        env: EnvSnapshot,
        cwd: &Path,
        platform: Platform,
        log: &dyn Log,
    ) -> Result<Self> {
        log.stage("Resolving configuration");
        let build = opts.resolve(&env, cwd).context("resolving build options")?;
        let config = get_config(&build.pkg, &env)
            .map_err(CepBundlerError::from)
            .with_context(|| format!("configuring {}", build.root.display()))?;

        log.info(&format!(
            "{} {} ({})",
            config.bundle_id, config.bundle_version, config.bundle_name
        ));
        log.debug(&format!("build env: {:?}", build.env));
        log.debug(&format!("output: {}", build.out.display()));
        log.debug(&format!("hosts: {}", config.hosts));
        log.debug(&format!("platform: {}", platform.os));

        Ok(Self {
            build,
            config,
            env,
            platform,
        })
    }
}

/// Resolve the configuration of the project at `root` without any build
/// options.
///
/// # Errors
///
/// Returns [`CepBundlerError::Config`] if `package.json` cannot be read or a
/// setting is malformed.
pub fn load_config(root: &Path, env: &EnvSnapshot) -> Result<CepConfig, CepBundlerError> {
    let pkg = PackageDescriptor::load(&root.join("package.json"))?;
    Ok(get_config(&pkg, env)?)
}

/// `--root`, or the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn project_root(root: Option<&Path>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root.to_path_buf()),
        None => std::env::current_dir().context("reading current directory"),
    }
}

/// Execute `tasks` in order, print the summary, and return the first failure.
///
/// # Errors
///
/// Returns [`CepBundlerError::Task`] naming the task that failed.
pub fn run_tasks_to_completion(
    tasks: &[Box<dyn Task>],
    ctx: &Context,
    log: &Logger,
) -> Result<(), CepBundlerError> {
    let result = tasks::execute_all(tasks, ctx);
    log.print_summary();
    result?;
    Ok(())
}
