use anyhow::{Context as _, Result};
use std::collections::BTreeSet;

use super::{Context, Task, TaskResult};
use crate::config::package::PackageDescriptor;

/// Copy runtime dependencies, and theirs, from `<root>/node_modules` into
/// `<out>/node_modules`.
///
/// Each package is visited once, so dependency cycles terminate. A package
/// already present in the output is not copied again but its own
/// dependencies are still walked.
#[derive(Debug)]
pub struct CopyDependencies;

impl Task for CopyDependencies {
    fn name(&self) -> &str {
        "Copy dependencies"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let roots = &ctx.build.pkg.dependencies;
        if roots.is_empty() {
            return Ok(TaskResult::Skipped("no runtime dependencies".to_string()));
        }

        let src_modules = ctx.build.root.join("node_modules");
        let dst_modules = ctx.build.out.join("node_modules");

        let mut visited = BTreeSet::new();
        // Stack; reversed so packages pop in name order.
        let mut pending: Vec<String> = roots.keys().rev().cloned().collect();
        let mut copied = 0u32;
        let mut present = 0u32;

        while let Some(name) = pending.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let src = src_modules.join(&name);
            let dst = dst_modules.join(&name);

            if ctx.fs_ops.exists(&dst) {
                ctx.log.debug(&format!("already present: {name}"));
                present += 1;
            } else {
                ctx.fs_ops
                    .copy(&src, &dst)
                    .with_context(|| format!("copying dependency {name}"))?;
                ctx.log.debug(&format!("copied {name}"));
                copied += 1;
            }

            let manifest_path = src.join("package.json");
            let text = ctx
                .fs_ops
                .read_to_string(&manifest_path)
                .with_context(|| format!("reading manifest of dependency {name}"))?;
            let manifest = PackageDescriptor::from_json(&text, &manifest_path)?;
            pending.extend(
                manifest
                    .dependencies
                    .into_keys()
                    .rev()
                    .filter(|dep| !visited.contains(dep)),
            );
        }

        ctx.log.info(&format!(
            "{copied} dependencies copied, {present} already present"
        ));
        Ok(TaskResult::Ok)
    }
}
