use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use rayon::prelude::*;

use super::{Context, Task, TaskResult};

/// Copy configured icon files from the project root into the output folder,
/// keeping their paths relative to the root.
///
/// Icons are copied concurrently. A failed copy is logged as a warning and
/// does not fail the build. An icon outside the project root, or one whose
/// destination is its own source, is never copied.
#[derive(Debug)]
pub struct CopyIcons;

impl Task for CopyIcons {
    fn name(&self) -> &str {
        "Copy icons"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let icons: Vec<_> = ctx.config.icons.slots().collect();
        if icons.is_empty() {
            return Ok(TaskResult::Skipped("no icons configured".to_string()));
        }

        let fs = ctx.fs_ops.as_ref();
        let root = &ctx.build.root;
        let out = &ctx.build.out;
        let results: Vec<_> = icons
            .par_iter()
            .map(|&(slot, path)| {
                let result =
                    icon_paths(root, out, path).and_then(|(src, dst)| fs.copy(&src, &dst));
                (slot, path, result)
            })
            .collect();

        let mut copied = 0usize;
        for (slot, path, result) in &results {
            match result {
                Ok(()) => {
                    ctx.log.debug(&format!("copied {slot} icon {path}"));
                    copied += 1;
                }
                Err(e) => ctx.log.warn(&format!("could not copy {slot} icon {path}: {e:#}")),
            }
        }
        ctx.log
            .info(&format!("{copied} of {} icons copied", results.len()));
        Ok(TaskResult::Ok)
    }
}

/// Source and destination for an icon configured as `path`.
///
/// # Errors
///
/// Fails when `path` leaves the project root or the destination would be the
/// source itself.
fn icon_paths(root: &Path, out: &Path, path: &str) -> Result<(PathBuf, PathBuf)> {
    let path = Path::new(path);
    let rel = if path.is_absolute() {
        match normalize(path).strip_prefix(normalize(root)) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => bail!("icon is outside the project root"),
        }
    } else {
        normalize(path)
    };
    match rel.components().next() {
        None => bail!("icon path names the project root"),
        Some(Component::ParentDir) => bail!("icon is outside the project root"),
        Some(_) => {}
    }
    let src = root.join(&rel);
    let dst = out.join(&rel);
    if normalize(&src) == normalize(&dst) {
        bail!("destination {} is the icon itself", dst.display());
    }
    Ok((src, dst))
}

/// Lexically resolve `.` and `..` components without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(parts.last(), Some(Component::Normal(_))) => {
                parts.pop();
            }
            Component::ParentDir if matches!(parts.last(), Some(Component::RootDir)) => {}
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::env::EnvSnapshot;
    use crate::config::layer::ConfigLayer;
    use crate::config::options::BuildEnv;
    use crate::operations::{FsCall, MockFileSystemOps};
    use crate::platform::Os;
    use crate::tasks::test_helpers::{build, harness, harness_with};

    fn two_icons() -> ConfigLayer {
        ConfigLayer {
            icon_normal: Some("icons/normal.png".to_string()),
            icon_dark_normal: Some("icons/dark.png".to_string()),
            ..ConfigLayer::default()
        }
    }

    #[test]
    fn skipped_without_icons() {
        let h = harness(build(BuildEnv::Production), Os::Linux, MockFileSystemOps::new());
        let result = CopyIcons.run(&h.ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(_)));
    }

    #[test]
    fn copies_each_icon_to_same_relative_path() {
        let h = harness_with(
            build(BuildEnv::Production),
            Os::Linux,
            MockFileSystemOps::new(),
            two_icons(),
            EnvSnapshot::default(),
        );
        assert_eq!(CopyIcons.run(&h.ctx).unwrap(), TaskResult::Ok);
        let calls = h.fs.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&FsCall::Copy(
            "/project/icons/normal.png".into(),
            "/project/dist/icons/normal.png".into()
        )));
        assert!(calls.contains(&FsCall::Copy(
            "/project/icons/dark.png".into(),
            "/project/dist/icons/dark.png".into()
        )));
    }

    #[test]
    fn failed_icon_does_not_fail_task() {
        let fs = MockFileSystemOps::new().failing_copy("/project/icons/normal.png");
        let h = harness_with(
            build(BuildEnv::Production),
            Os::Linux,
            fs,
            two_icons(),
            EnvSnapshot::default(),
        );
        assert_eq!(CopyIcons.run(&h.ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            h.fs.calls(),
            vec![FsCall::Copy(
                "/project/icons/dark.png".into(),
                "/project/dist/icons/dark.png".into()
            )]
        );
    }

    #[test]
    fn absolute_icon_under_root_is_copied_relative_to_root() {
        let layer = ConfigLayer {
            icon_normal: Some("/project/assets/icon.png".to_string()),
            ..ConfigLayer::default()
        };
        let h = harness_with(
            build(BuildEnv::Production),
            Os::Linux,
            MockFileSystemOps::new(),
            layer,
            EnvSnapshot::default(),
        );
        assert_eq!(CopyIcons.run(&h.ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            h.fs.calls(),
            vec![FsCall::Copy(
                "/project/assets/icon.png".into(),
                "/project/dist/assets/icon.png".into()
            )]
        );
    }

    #[test]
    fn icon_outside_root_is_not_copied() {
        let layer = ConfigLayer {
            icon_normal: Some("/elsewhere/icon.png".to_string()),
            icon_rollover: Some("../shared/hover.png".to_string()),
            ..ConfigLayer::default()
        };
        let h = harness_with(
            build(BuildEnv::Production),
            Os::Linux,
            MockFileSystemOps::new(),
            layer,
            EnvSnapshot::default(),
        );
        assert_eq!(CopyIcons.run(&h.ctx).unwrap(), TaskResult::Ok);
        assert!(h.fs.calls().is_empty());
    }

    #[test]
    fn icon_is_never_copied_onto_itself() {
        let err = icon_paths(
            Path::new("/project"),
            Path::new("/project/."),
            "assets/icon.png",
        )
        .unwrap_err();
        assert!(err.to_string().contains("is the icon itself"));
    }

    #[test]
    fn icon_naming_the_root_is_rejected() {
        for path in [".", "/project", "assets/.."] {
            assert!(
                icon_paths(Path::new("/project"), Path::new("/project/dist"), path).is_err(),
                "{path}"
            );
        }
    }

    #[test]
    fn dot_segments_are_resolved() {
        let (src, dst) = icon_paths(
            Path::new("/project"),
            Path::new("/project/dist"),
            "./assets/../icons/icon.png",
        )
        .unwrap();
        assert_eq!(src, PathBuf::from("/project/icons/icon.png"));
        assert_eq!(dst, PathBuf::from("/project/dist/icons/icon.png"));
    }
}
