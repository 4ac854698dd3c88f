use std::sync::Arc;

use crate::config::CepConfig;
use crate::config::env::EnvSnapshot;
use crate::config::hosts::Host;
use crate::config::options::ResolvedBuild;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;

/// Shared context for task execution.
pub struct Context {
    /// Build options with defaults applied.
    pub build: ResolvedBuild,
    /// Resolved extension configuration.
    pub config: CepConfig,
    /// Parsed host list from `config.hosts`.
    pub hosts: Vec<Host>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Environment captured at start-up.
    pub env: EnvSnapshot,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("build", &self.build)
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context for task execution backed by the real
    /// filesystem.
    #[must_use]
    pub fn new(
        build: ResolvedBuild,
        config: CepConfig,
        platform: Arc<Platform>,
        env: EnvSnapshot,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let hosts = config.host_list();
        Self {
            build,
            config,
            hosts,
            platform,
            env,
            log,
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }

    /// Replace the [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Whether linking into the extensions folder is turned off, by the
    /// build options or by the configuration.
    #[must_use]
    pub fn link_suppressed(&self) -> bool {
        self.build.no_symlink || self.config.no_symlink
    }

    /// Whether the `.debug` descriptor belongs in this build.
    #[must_use]
    pub fn writes_debug_file(&self) -> bool {
        !self.build.env.is_production() || self.config.debug_in_production
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crate::config::env::EnvSnapshot;
    use crate::config::layer::ConfigLayer;
    use crate::config::options::BuildEnv;
    use crate::operations::MockFileSystemOps;
    use crate::platform::Os;
    use crate::tasks::test_helpers::{build, harness, harness_with};

    #[test]
    fn hosts_are_parsed_from_config() {
        let h = harness(build(BuildEnv::Production), Os::Linux, MockFileSystemOps::new());
        assert_eq!(h.ctx.hosts.len(), 12);
        assert_eq!(h.ctx.hosts[0].name, "PHXS");
    }

    #[test]
    fn link_suppressed_by_either_source() {
        let h = harness(build(BuildEnv::Development), Os::MacOs, MockFileSystemOps::new());
        assert!(!h.ctx.link_suppressed());

        let mut opts = build(BuildEnv::Development);
        opts.no_symlink = true;
        let h = harness(opts, Os::MacOs, MockFileSystemOps::new());
        assert!(h.ctx.link_suppressed());

        let layer = ConfigLayer {
            no_symlink: Some(true),
            ..ConfigLayer::default()
        };
        let h = harness_with(
            build(BuildEnv::Development),
            Os::MacOs,
            MockFileSystemOps::new(),
            layer,
            EnvSnapshot::default(),
        );
        assert!(h.ctx.link_suppressed());
    }

    #[test]
    fn debug_file_rules() {
        let dev = harness(build(BuildEnv::Development), Os::Linux, MockFileSystemOps::new());
        assert!(dev.ctx.writes_debug_file());

        let other = harness(build(BuildEnv::Other(String::new())), Os::Linux, MockFileSystemOps::new());
        assert!(other.ctx.writes_debug_file());

        let prod = harness(build(BuildEnv::Production), Os::Linux, MockFileSystemOps::new());
        assert!(!prod.ctx.writes_debug_file());

        let layer = ConfigLayer {
            debug_in_production: Some(true),
            ..ConfigLayer::default()
        };
        let prod = harness_with(
            build(BuildEnv::Production),
            Os::Linux,
            MockFileSystemOps::new(),
            layer,
            EnvSnapshot::default(),
        );
        assert!(prod.ctx.writes_debug_file());
    }

    #[test]
    fn debug_format_includes_key_fields() {
        let h = harness(build(BuildEnv::Production), Os::Linux, MockFileSystemOps::new());
        let debug = format!("{:?}", h.ctx);
        assert!(debug.contains("Context"));
        assert!(debug.contains("bundle_id"));
    }
}
