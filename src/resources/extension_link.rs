//! Link from the host applications' extensions folder to a build output.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::operations::FileSystemOps;

/// A directory link at `link` pointing to `target`.
///
/// [`apply`](Applicable::apply) always recreates the link so a stale one from
/// an older output folder is replaced.
#[derive(Debug, Clone)]
pub struct ExtensionLink {
    /// Build output folder (what the link points to).
    pub target: PathBuf,
    /// `<extensions dir>/<bundle id>` (where the link lives).
    pub link: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl ExtensionLink {
    /// Create a new link resource.
    #[must_use]
    pub fn new(target: PathBuf, link: PathBuf, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            target,
            link,
            fs_ops,
        }
    }
}

impl Applicable for ExtensionLink {
    fn description(&self) -> String {
        format!("{} -> {}", self.link.display(), self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if let Some(parent) = self.link.parent() {
            self.fs_ops.create_dir_all(parent)?;
        }
        if self.fs_ops.exists(&self.link) {
            self.fs_ops
                .remove(&self.link)
                .with_context(|| format!("remove existing: {}", self.link.display()))?;
        }
        self.fs_ops
            .symlink_dir(&self.target, &self.link)
            .with_context(|| format!("create link: {}", self.link.display()))?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if !self.fs_ops.exists(&self.link) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if self.fs_ops.read_link(&self.link).is_err() {
            return Ok(ResourceChange::Skipped {
                reason: format!("{} is not a link", self.link.display()),
            });
        }
        self.fs_ops
            .remove(&self.link)
            .with_context(|| format!("remove link: {}", self.link.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ExtensionLink {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.fs_ops.exists(&self.link) {
            return Ok(ResourceState::Missing);
        }
        match self.fs_ops.read_link(&self.link) {
            Ok(existing) if paths_equal(&existing, &self.target) => Ok(ResourceState::Correct),
            Ok(existing) => Ok(ResourceState::Incorrect {
                current: format!("points to {}", existing.display()),
            }),
            Err(_) => Ok(ResourceState::Incorrect {
                current: "not a link".to_string(),
            }),
        }
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}
