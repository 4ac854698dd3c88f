use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::templates::{render_debug, render_manifest, render_panel};

/// Write `CSXS/manifest.xml`, `.debug` when wanted, and `panel.html`.
#[derive(Debug)]
pub struct WriteTemplates;

impl Task for WriteTemplates {
    fn name(&self) -> &str {
        "Write templates"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for host in ctx.hosts.iter().filter(|h| !h.is_known()) {
            ctx.log.warn(&format!("unknown host code: {}", host.name));
        }

        let out = &ctx.build.out;
        let csxs = out.join("CSXS");
        ctx.fs_ops.create_dir_all(&csxs)?;

        let manifest = csxs.join("manifest.xml");
        ctx.fs_ops
            .write(&manifest, &render_manifest(&ctx.config, &ctx.hosts))?;
        ctx.log.debug(&format!("wrote {}", manifest.display()));

        if ctx.writes_debug_file() {
            let debug = out.join(".debug");
            ctx.fs_ops
                .write(&debug, &render_debug(&ctx.config.bundle_id))?;
            ctx.log.debug(&format!("wrote {}", debug.display()));
        }

        let panel = out.join("panel.html");
        ctx.fs_ops.write(
            &panel,
            &render_panel(&ctx.config.bundle_name, &ctx.build.panel_href()),
        )?;
        ctx.log.debug(&format!("wrote {}", panel.display()));

        Ok(TaskResult::Ok)
    }
}
