use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::player_debug_mode::PlayerDebugMode;
use crate::resources::{Applicable as _, ResourceChange};

/// Turn on `PlayerDebugMode` so the host loads the unsigned extension.
#[derive(Debug)]
pub struct EnablePlayerDebugMode;

impl Task for EnablePlayerDebugMode {
    fn name(&self) -> &'static str {
        "Enable debug mode"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.build.env.is_development()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = PlayerDebugMode::new(&ctx.platform, ctx.executor.as_ref());
        ctx.log.debug(&resource.description());
        match resource.apply()? {
            ResourceChange::Skipped { reason } => {
                ctx.log.debug(&format!("debug mode unchanged: {reason}"));
                Ok(TaskResult::Skipped(reason))
            }
            ResourceChange::Applied | ResourceChange::AlreadyCorrect => Ok(TaskResult::Ok),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::options::BuildEnv;
    use crate::operations::MockFileSystemOps;
    use crate::platform::Os;
    use crate::tasks::test_helpers::{build, harness};

    #[test]
    fn runs_only_in_development() {
        let dev = harness(build(BuildEnv::Development), Os::MacOs, MockFileSystemOps::new());
        assert!(EnablePlayerDebugMode.should_run(&dev.ctx));
        let prod = harness(build(BuildEnv::Production), Os::MacOs, MockFileSystemOps::new());
        assert!(!EnablePlayerDebugMode.should_run(&prod.ctx));
        let other = harness(build(BuildEnv::parse("test")), Os::MacOs, MockFileSystemOps::new());
        assert!(!EnablePlayerDebugMode.should_run(&other.ctx));
    }

    #[test]
    fn writes_preferences_on_macos() {
        let h = harness(build(BuildEnv::Development), Os::MacOs, MockFileSystemOps::new());
        let result = EnablePlayerDebugMode.run(&h.ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);
        assert_eq!(h.exec.calls().len(), 12);
    }

    #[test]
    fn skipped_on_linux() {
        let h = harness(build(BuildEnv::Development), Os::Linux, MockFileSystemOps::new());
        let result = EnablePlayerDebugMode.run(&h.ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(_)));
        assert!(h.exec.calls().is_empty());
    }
}
