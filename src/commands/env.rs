//! Env command: print the resolved configuration as `KEY=VALUE` lines.
use anyhow::Result;
use std::path::Path;

use super::{load_config, project_root};
use crate::cli::GlobalOpts;
use crate::config::env::EnvSnapshot;
use crate::config::export::to_env_pairs;

/// Run the env command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let root = project_root(global.root.as_deref())?;
    for line in env_lines(&root, &EnvSnapshot::capture())? {
        println!("{line}");
    }
    Ok(())
}

/// The lines [`run`] prints for the project at `root`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved.
pub fn env_lines(root: &Path, env: &EnvSnapshot) -> Result<Vec<String>> {
    let config = load_config(root, env)?;
    Ok(to_env_pairs(&config)?.to_lines())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn prints_resolved_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "version": "4.2.0", "cep": { "hosts": "PHXS" } }"#,
        )
        .unwrap();
        let env = EnvSnapshot::from_pairs([("CEP_PANEL_WIDTH", "320")]);
        let lines = env_lines(dir.path(), &env).unwrap();
        assert!(lines.contains(&"BUNDLE_VERSION=4.2.0".to_string()));
        assert!(lines.contains(&"HOSTS=PHXS".to_string()));
        assert!(lines.contains(&"PANEL_WIDTH=320".to_string()));
        assert!(lines.contains(&"NO_SYMLINK=false".to_string()));
    }
}
