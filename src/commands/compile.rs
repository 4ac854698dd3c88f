//! Compile command: turn a web build into an installable extension folder.
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use super::{CommandSetup, project_root, run_tasks_to_completion};
use crate::cli::{CompileOpts, GlobalOpts};
use crate::config::env::EnvSnapshot;
use crate::config::options::BuildOptions;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context};

/// Run the compile command.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or a task fails.
pub fn run(global: &GlobalOpts, opts: &CompileOpts, log: &Arc<Logger>) -> Result<()> {
    let cwd = project_root(None)?;
    compile(
        opts.build_options(global.root.clone()),
        EnvSnapshot::capture(),
        &cwd,
        Platform::detect(),
        log,
        Arc::new(SystemExecutor),
    )
}

/// Resolve `opts` against `env` and run the compile pipeline.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or a task fails.
pub fn compile(
    opts: BuildOptions,
    env: EnvSnapshot,
    cwd: &Path,
    platform: Platform,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let version = option_env!("CEP_BUNDLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("cep-bundler {version}"));

    let setup = CommandSetup::init(opts, env, cwd, platform, log.as_ref())?;
    let ctx = Context::new(
        setup.build,
        setup.config,
        Arc::new(setup.platform),
        setup.env,
        Arc::clone(log) as Arc<dyn Log>,
        executor,
    );
    Ok(run_tasks_to_completion(&tasks::compile_tasks(), &ctx, log)?)
}
