//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory tree.
///
/// Symlinks inside the tree are recreated as links with the same target, so
/// a link that points back at an ancestor cannot recurse forever. Existing
/// entries in `dst` are overwritten.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file or link cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {}", src_path.display()))?;
        if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Recreate the link at `src` as `dst`, replacing whatever `dst` holds.
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target =
        std::fs::read_link(src).with_context(|| format!("reading link {}", src.display()))?;
    remove_existing(dst)?;
    create_symlink(src, &target, dst)
        .with_context(|| format!("linking {} to {}", dst.display(), target.display()))
}

fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path).or_else(|_| std::fs::remove_dir(path))
    };
    removed.with_context(|| format!("removing {}", path.display()))
}

#[cfg(unix)]
fn create_symlink(_src: &Path, target: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(windows)]
fn create_symlink(src: &Path, target: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn copies_files_and_subdirectories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::write(src.path().join("package.json"), b"{}").unwrap();
        std::fs::create_dir(src.path().join("lib")).unwrap();
        std::fs::write(src.path().join("lib/index.js"), b"module.exports = 1").unwrap();

        let target = dst.path().join("node_modules").join("left-pad");
        copy_dir_recursive(src.path(), &target).unwrap();

        assert_eq!(std::fs::read(target.join("package.json")).unwrap(), b"{}");
        assert_eq!(
            std::fs::read(target.join("lib/index.js")).unwrap(),
            b"module.exports = 1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn preserves_symlinks() {
        let src = tempfile::tempdir().unwrap();
        let real = tempfile::tempdir().unwrap();
        std::fs::write(real.path().join("a.txt"), b"a").unwrap();
        std::os::unix::fs::symlink(real.path(), src.path().join("linked")).unwrap();
        std::os::unix::fs::symlink("missing.js", src.path().join("dangling.js")).unwrap();

        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("out");
        copy_dir_recursive(src.path(), &target).unwrap();

        let copied = target.join("linked");
        assert!(copied.symlink_metadata().unwrap().is_symlink());
        assert_eq!(std::fs::read_link(&copied).unwrap(), real.path());
        assert_eq!(
            std::fs::read_link(target.join("dangling.js")).unwrap(),
            Path::new("missing.js")
        );
    }

    #[cfg(unix)]
    #[test]
    fn link_to_ancestor_does_not_recurse() {
        let src = tempfile::tempdir().unwrap();
        let dep = src.path().join("dep");
        std::fs::create_dir(&dep).unwrap();
        std::fs::write(dep.join("index.js"), b"1").unwrap();
        std::os::unix::fs::symlink(&dep, dep.join("self")).unwrap();

        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("dep");
        copy_dir_recursive(&dep, &target).unwrap();

        assert_eq!(std::fs::read(target.join("index.js")).unwrap(), b"1");
        assert_eq!(std::fs::read_link(target.join("self")).unwrap(), dep);
    }

    #[cfg(unix)]
    #[test]
    fn recopying_replaces_existing_links() {
        let src = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("first", src.path().join("link")).unwrap();
        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("out");
        copy_dir_recursive(src.path(), &target).unwrap();

        std::fs::remove_file(src.path().join("link")).unwrap();
        std::os::unix::fs::symlink("second", src.path().join("link")).unwrap();
        copy_dir_recursive(src.path(), &target).unwrap();

        assert_eq!(std::fs::read_link(target.join("link")).unwrap(), Path::new("second"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_dir_recursive(&dir.path().join("absent"), &dir.path().join("out"))
            .unwrap_err();
        assert!(err.to_string().contains("reading directory"));
    }

    // -----------------------------------------------------------------------
    // ensure_parent_dir
    // -----------------------------------------------------------------------

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("CSXS").join("manifest.xml");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("CSXS").is_dir());
    }

    #[test]
    fn ensure_parent_dir_accepts_bare_file_name() {
        ensure_parent_dir(Path::new("panel.html")).unwrap();
    }
}
