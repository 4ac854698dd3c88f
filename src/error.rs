//! Domain-specific error types for the bundler.
//!
//! Library modules return typed errors built with [`thiserror`]; task and
//! command boundaries convert them to [`anyhow::Error`] via the `?` operator
//! and attach context there.
//!
//! # Error hierarchy
//!
//! ```text
//! CepBundlerError
//! ├── Config(ConfigError)     : package.json parsing, environment values
//! ├── Task(TaskError)         : a compile step failed and aborted the build
//! └── Platform(PlatformError) : OS-specific operation failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the bundler.
#[derive(Error, Debug)]
pub enum CepBundlerError {
    /// Configuration-related error (package descriptor, environment values).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A compile step failed.
    #[error("Task execution error: {0}")]
    Task(#[from] TaskError),

    /// Platform-specific operation error.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors that arise while loading and resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("Invalid number for {key}: '{value}'")]
    InvalidNumber {
        /// Environment variable or `cep` key that carried the value.
        key: String,
        /// The raw value as given.
        value: String,
    },

    /// A package descriptor is not valid JSON or has the wrong shape.
    #[error("Invalid package descriptor {path}: {source}")]
    InvalidPackage {
        /// Path of the offending `package.json`.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// An I/O error occurred while reading a package descriptor.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The build output directory was not given.
    #[error("No output directory given")]
    MissingOutDir,
}

/// Errors that arise during the compile pipeline.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A task failed to execute; the build stops here.
    #[error("Task '{task}' failed: {reason}")]
    ExecutionFailed {
        /// Name of the task that failed.
        task: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
}

/// Errors that arise from platform-specific operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The requested operation is not supported on the current platform.
    #[error("Operation not supported on {platform}")]
    Unsupported {
        /// Name of the platform (e.g., `"linux"`).
        platform: String,
    },

    /// A required environment variable for locating a platform folder is unset.
    #[error("Environment variable {0} is not set")]
    MissingVariable(String),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn invalid_number_display() {
        let e = ConfigError::InvalidNumber {
            key: "CEP_PANEL_WIDTH".to_string(),
            value: "wide".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid number for CEP_PANEL_WIDTH: 'wide'");
    }

    #[test]
    fn io_error_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("/project/package.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("/project/package.json"));
        assert!(e.source().is_some());
    }

    #[test]
    fn task_error_display() {
        let e = TaskError::ExecutionFailed {
            task: "Copy dependencies".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Task 'Copy dependencies' failed: permission denied"
        );
    }

    #[test]
    fn platform_error_display() {
        let e = PlatformError::Unsupported {
            platform: "linux".to_string(),
        };
        assert_eq!(e.to_string(), "Operation not supported on linux");
        let e = PlatformError::MissingVariable("APPDATA".to_string());
        assert_eq!(e.to_string(), "Environment variable APPDATA is not set");
    }

    #[test]
    fn umbrella_wraps_sub_errors() {
        let e: CepBundlerError = ConfigError::MissingOutDir.into();
        assert!(e.to_string().contains("Configuration error"));
        let e: CepBundlerError = PlatformError::MissingVariable("HOME".to_string()).into();
        assert!(e.to_string().contains("Platform error"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<CepBundlerError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<TaskError>();
        assert_send_sync::<PlatformError>();
    }

    #[test]
    fn config_error_converts_to_anyhow() {
        let e = ConfigError::MissingOutDir;
        let _anyhow_err: anyhow::Error = e.into();
    }
}
