use std::fmt;
use std::path::PathBuf;

use crate::config::env::EnvSnapshot;
use crate::error::PlatformError;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// macOS; preferences live in `defaults` domains.
    MacOs,
    /// Windows; preferences live in the registry.
    Windows,
    /// Any other OS. No CEP hosts run here.
    Linux,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// The operating system.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit OS.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether this is macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Whether this is Windows.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Whether CEP hosts exist on this platform at all.
    #[must_use]
    pub fn supports_cep(&self) -> bool {
        self.is_macos() || self.is_windows()
    }

    /// Folder the host applications scan for unpacked extensions.
    ///
    /// macOS: `$HOME/Library/Application Support/Adobe/CEP/extensions`.
    /// Windows: `%APPDATA%/Adobe/CEP/extensions`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on platforms without CEP hosts,
    /// or [`PlatformError::MissingVariable`] if the base folder variable is unset.
    pub fn extensions_dir(&self, env: &EnvSnapshot) -> Result<PathBuf, PlatformError> {
        match self.os {
            Os::MacOs => {
                let home = env
                    .get("HOME")
                    .ok_or_else(|| PlatformError::MissingVariable("HOME".to_string()))?;
                Ok(PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("Adobe")
                    .join("CEP")
                    .join("extensions"))
            }
            Os::Windows => {
                let appdata = env
                    .get("APPDATA")
                    .ok_or_else(|| PlatformError::MissingVariable("APPDATA".to_string()))?;
                Ok(PathBuf::from(appdata)
                    .join("Adobe")
                    .join("CEP")
                    .join("extensions"))
            }
            Os::Linux => Err(PlatformError::Unsupported {
                platform: self.os.to_string(),
            }),
        }
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            // Everything else is treated like Linux: no CEP hosts.
            Os::Linux
        }
    }
}
