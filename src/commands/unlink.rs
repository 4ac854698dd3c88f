//! Unlink command: the counterpart of linking during a development build.
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use super::{load_config, project_root};
use crate::cli::{GlobalOpts, UnlinkOpts};
use crate::config::env::EnvSnapshot;
use crate::error::{CepBundlerError, PlatformError};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::resources::extension_link::ExtensionLink;
use crate::resources::player_debug_mode::disable_player_debug_mode;
use crate::resources::{Applicable as _, ResourceChange};

/// Run the unlink command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved or the link
/// cannot be removed.
pub fn run(global: &GlobalOpts, opts: &UnlinkOpts, log: &Logger) -> Result<()> {
    let root = project_root(global.root.as_deref())?;
    let fs_ops: Arc<dyn FileSystemOps> = Arc::new(SystemFileSystemOps);
    unlink(
        &root,
        opts,
        &EnvSnapshot::capture(),
        &Platform::detect(),
        log,
        &SystemExecutor,
        fs_ops,
    )
}

/// Remove `<extensions dir>/<bundle id>` for the project at `root`.
///
/// A path that is not a link is left alone with a warning.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved, the link cannot
/// be removed, or debug mode cannot be disabled.
pub fn unlink(
    root: &Path,
    opts: &UnlinkOpts,
    env: &EnvSnapshot,
    platform: &Platform,
    log: &dyn Log,
    executor: &dyn Executor,
    fs_ops: Arc<dyn FileSystemOps>,
) -> Result<()> {
    let config = load_config(root, env)?;

    log.stage("Removing extension link");
    match platform.extensions_dir(env) {
        Ok(dir) => {
            let link = ExtensionLink::new(root.join(&opts.out), dir.join(&config.bundle_id), fs_ops);
            match link.remove()? {
                ResourceChange::Applied => log.info(&format!("removed {}", link.link.display())),
                ResourceChange::AlreadyCorrect => {
                    log.info(&format!("no link at {}", link.link.display()));
                }
                ResourceChange::Skipped { reason } => log.warn(&reason),
            }
        }
        Err(e @ PlatformError::Unsupported { .. }) => log.info(&format!("skipped: {e}")),
        Err(e) => return Err(CepBundlerError::from(e).into()),
    }

    if opts.disable_debug {
        log.stage("Disabling debug mode");
        disable_player_debug_mode(platform, executor)?;
    }
    Ok(())
}
