use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{Context, Task, TaskResult};
use crate::error::PlatformError;
use crate::resources::extension_link::ExtensionLink;
use crate::resources::{Applicable as _, Resource as _};

/// Link the build output into the host extensions folder so the panel is
/// picked up without packaging.
#[derive(Debug)]
pub struct LinkExtension;

/// `<extensions dir>/<bundle id>` for this build, or why there is none.
///
/// # Errors
///
/// Returns [`PlatformError`] when the platform has no extensions folder or
/// its base variable is unset.
pub fn link_path(ctx: &Context) -> Result<PathBuf, PlatformError> {
    Ok(ctx
        .platform
        .extensions_dir(&ctx.env)?
        .join(&ctx.config.bundle_id))
}

impl Task for LinkExtension {
    fn name(&self) -> &str {
        "Link extension"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.build.env.is_development() && !ctx.link_suppressed()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let link = match link_path(ctx) {
            Ok(link) => link,
            Err(e @ PlatformError::Unsupported { .. }) => {
                return Ok(TaskResult::Skipped(e.to_string()));
            }
            Err(e) => return Err(e).context("locating the extensions folder"),
        };

        ctx.fs_ops.create_dir_all(&ctx.build.out)?;
        let target = dunce::canonicalize(&ctx.build.out).unwrap_or_else(|_| ctx.build.out.clone());
        let resource = ExtensionLink::new(target, link, Arc::clone(&ctx.fs_ops));

        let stale = resource.needs_change()?;
        resource.apply()?;
        if stale {
            ctx.log.info(&format!("linked {}", resource.description()));
        } else {
            ctx.log.info(&format!("refreshed {}", resource.description()));
        }
        Ok(TaskResult::Ok)
    }
}
