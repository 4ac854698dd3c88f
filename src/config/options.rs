//! Build options and their defaults.
use std::fmt;
use std::path::{Path, PathBuf};

use super::env::{self, EnvSnapshot};
use super::package::PackageDescriptor;
use crate::error::ConfigError;

/// Panel file name used in production when none is given.
pub const DEFAULT_HTML_FILENAME: &str = "index.html";

/// Dev-server port used in development when none is given.
pub const DEFAULT_DEV_PORT: u16 = 1234;

/// Which kind of build is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEnv {
    /// `development`: links the output and targets the dev server.
    Development,
    /// `production`: loads the bundled page.
    Production,
    /// Any other value, including none at all.
    Other(String),
}

impl BuildEnv {
    /// Parse a `NODE_ENV`-style value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "development" => Self::Development,
            "production" => Self::Production,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this is a development build.
    #[must_use]
    pub fn is_development(&self) -> bool {
        *self == Self::Development
    }

    /// Whether this is a production build.
    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl fmt::Display for BuildEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// Caller-supplied build options; unset fields take defaults in
/// [`BuildOptions::resolve`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build environment; `NODE_ENV` when unset.
    pub env: Option<BuildEnv>,
    /// Project root; the working directory when unset.
    pub root: Option<PathBuf>,
    /// Output folder, relative to the root. Required.
    pub out: Option<PathBuf>,
    /// Page opened in production builds.
    pub html_filename: Option<String>,
    /// Dev-server port opened in other builds.
    pub dev_port: Option<u16>,
    /// Already parsed `package.json`; read from the root when unset.
    pub pkg: Option<PackageDescriptor>,
    /// Skip linking into the extensions folder even in development.
    pub no_symlink: bool,
}

/// Build options with every default applied.
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    /// Build environment.
    pub env: BuildEnv,
    /// Project root.
    pub root: PathBuf,
    /// Output folder, joined onto the root.
    pub out: PathBuf,
    /// Page opened in production builds.
    pub html_filename: String,
    /// Dev-server port opened in other builds.
    pub dev_port: u16,
    /// The project's `package.json`.
    pub pkg: PackageDescriptor,
    /// Skip linking into the extensions folder.
    pub no_symlink: bool,
}

impl BuildOptions {
    /// Apply defaults: env from `NODE_ENV`, root from `cwd`, `index.html`,
    /// port 1234, and `<root>/package.json` for the descriptor. A relative
    /// `out` is taken relative to the root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOutDir`] without an output directory, or
    /// a load error if the descriptor has to be read and cannot be.
    pub fn resolve(self, vars: &EnvSnapshot, cwd: &Path) -> Result<ResolvedBuild, ConfigError> {
        let env = self.env.unwrap_or_else(|| {
            BuildEnv::parse(vars.get(env::NODE_ENV).unwrap_or_default())
        });
        let root = self.root.unwrap_or_else(|| cwd.to_path_buf());
        let out = self.out.ok_or(ConfigError::MissingOutDir)?;
        let out = if out.is_absolute() { out } else { root.join(out) };
        let pkg = match self.pkg {
            Some(pkg) => pkg,
            None => PackageDescriptor::load(&root.join("package.json"))?,
        };

        Ok(ResolvedBuild {
            env,
            root,
            out,
            html_filename: self
                .html_filename
                .unwrap_or_else(|| DEFAULT_HTML_FILENAME.to_string()),
            dev_port: self.dev_port.unwrap_or(DEFAULT_DEV_PORT),
            pkg,
            no_symlink: self.no_symlink,
        })
    }
}

impl ResolvedBuild {
    /// Where `panel.html` sends the browser: the dev server in development,
    /// the packaged html file otherwise.
    #[must_use]
    pub fn panel_href(&self) -> String {
        if self.env.is_production() {
            self.html_filename.clone()
        } else {
            format!("http://localhost:{}", self.dev_port)
        }
    }
}
