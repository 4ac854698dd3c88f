//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that compile tasks can be
//! unit-tested without touching the real filesystem. Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem mutations performed by a build.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists. Broken symlinks count as existing.
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write `contents` to `path`, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Read `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Copy a file or directory tree from `src` to `dst`, creating the
    /// parents of `dst`.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` is missing or any entry cannot be copied.
    fn copy(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Create a directory link at `link` pointing to `target`.
    ///
    /// A junction on Windows, a symbolic link elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()>;

    /// Read the target of the symlink or junction at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a link or cannot be read.
    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf>;

    /// Remove a file, symlink, junction or directory tree at `path`.
    ///
    /// Links are removed without touching what they point to. Removing an
    /// absent path succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` exists but cannot be removed.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists() || path.symlink_metadata().is_ok()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        crate::resources::helpers::fs::ensure_parent_dir(dst)?;
        if src.is_dir() {
            crate::resources::helpers::fs::copy_dir_recursive(src, dst)
        } else {
            std::fs::copy(src, dst)
                .map(|_| ())
                .with_context(|| format!("copying {} to {}", src.display(), dst.display()))
        }
    }

    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link).with_context(|| {
                format!("creating symlink {} -> {}", link.display(), target.display())
            })
        }

        #[cfg(windows)]
        {
            // Directory junction via cmd.exe.
            let link_str = link.to_string_lossy();
            let target_str = target.to_string_lossy();
            crate::exec::run("cmd", &["/c", "mklink", "/J", &*link_str, &*target_str])
                .map(|_| ())
                .with_context(|| {
                    format!("creating junction {} -> {}", link.display(), target.display())
                })
        }
    }

    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let Ok(meta) = std::fs::symlink_metadata(path) else {
            return Ok(());
        };
        let result = if meta.is_symlink() || is_junction(&meta) {
            if is_dir_like(&meta) {
                std::fs::remove_dir(path)
            } else {
                std::fs::remove_file(path)
            }
        } else if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        result.with_context(|| format!("removing {}", path.display()))
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks and junctions, so the raw `FILE_ATTRIBUTE_DIRECTORY` bit is used.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Junctions are reparse points that `is_symlink` does not report.
fn is_junction(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x400 != 0 // FILE_ATTRIBUTE_REPARSE_POINT
    }
    #[cfg(not(windows))]
    {
        let _ = meta;
        false
    }
}

/// One mutation recorded by `MockFileSystemOps`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    CreateDirAll(std::path::PathBuf),
    Write(std::path::PathBuf),
    Copy(std::path::PathBuf, std::path::PathBuf),
    SymlinkDir(std::path::PathBuf, std::path::PathBuf),
    Remove(std::path::PathBuf),
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths and file contents with the builder-style
/// methods. Every mutation is recorded and can be inspected with
/// [`calls`](Self::calls); written files become readable and existing.
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/p/node_modules/a/package.json", r#"{"name":"a"}"#)
///     .failing_copy("/p/icon.png");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    state: std::sync::Mutex<MockState>,
    failing_copies: Vec<std::path::PathBuf>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MockState {
    files: std::collections::BTreeMap<std::path::PathBuf, String>,
    existing: std::collections::BTreeSet<std::path::PathBuf>,
    links: std::collections::BTreeMap<std::path::PathBuf, std::path::PathBuf>,
    calls: Vec<FsCall>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing.
    #[must_use]
    pub fn with_existing(self, path: impl Into<std::path::PathBuf>) -> Self {
        self.lock().existing.insert(path.into());
        self
    }

    /// Register a readable file (also marks it as existing).
    #[must_use]
    pub fn with_file(self, path: impl Into<std::path::PathBuf>, contents: &str) -> Self {
        let path = path.into();
        {
            let mut state = self.lock();
            state.existing.insert(path.clone());
            state.files.insert(path, contents.to_string());
        }
        self
    }

    /// Register a directory link at `link` pointing to `target`.
    #[must_use]
    pub fn with_link(
        self,
        link: impl Into<std::path::PathBuf>,
        target: impl Into<std::path::PathBuf>,
    ) -> Self {
        let link = link.into();
        {
            let mut state = self.lock();
            state.existing.insert(link.clone());
            state.links.insert(link, target.into());
        }
        self
    }

    /// Make every copy from `src` fail.
    #[must_use]
    pub fn failing_copy(mut self, src: impl Into<std::path::PathBuf>) -> Self {
        self.failing_copies.push(src.into());
        self
    }

    /// Mutations in the order they happened.
    #[must_use]
    pub fn calls(&self) -> Vec<FsCall> {
        self.lock().calls.clone()
    }

    /// Contents written to `path`, if any.
    #[must_use]
    pub fn written(&self, path: &Path) -> Option<String> {
        self.lock().files.get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.lock().existing.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        state.existing.insert(path.to_path_buf());
        state.calls.push(FsCall::CreateDirAll(path.to_path_buf()));
        Ok(())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let mut state = self.lock();
        state.existing.insert(path.to_path_buf());
        state.files.insert(path.to_path_buf(), contents.to_string());
        state.calls.push(FsCall::Write(path.to_path_buf()));
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("mock: no such file {}", path.display()))
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        if self.failing_copies.iter().any(|p| p == src) {
            anyhow::bail!("mock: copy failed for {}", src.display());
        }
        let mut state = self.lock();
        state.existing.insert(dst.to_path_buf());
        state
            .calls
            .push(FsCall::Copy(src.to_path_buf(), dst.to_path_buf()));
        Ok(())
    }

    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()> {
        let mut state = self.lock();
        state.existing.insert(link.to_path_buf());
        state.links.insert(link.to_path_buf(), target.to_path_buf());
        state
            .calls
            .push(FsCall::SymlinkDir(target.to_path_buf(), link.to_path_buf()));
        Ok(())
    }

    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf> {
        self.lock()
            .links
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::InvalidInput))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        state.existing.remove(path);
        state.files.remove(path);
        state.links.remove(path);
        state.calls.push(FsCall::Remove(path.to_path_buf()));
        Ok(())
    }
}
