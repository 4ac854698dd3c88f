// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed project and a fluent builder so each
// integration test can lay out `package.json`, `node_modules`, and icons
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use cep_bundler::config::env::EnvSnapshot;
use cep_bundler::config::options::{BuildEnv, BuildOptions};
use cep_bundler::exec::{ExecResult, Executor};
use cep_bundler::logging::Logger;
use cep_bundler::platform::Platform;

/// Executor that records every command and reports success.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Commands issued so far, as `program arg...`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("executor lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("executor lock").push(line);
        ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.record(program, args))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.record(program, args))
    }
}

/// An isolated project backed by a [`tempfile::TempDir`].
pub struct TestProject {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl TestProject {
    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// `<root>/dist`.
    pub fn out(&self) -> PathBuf {
        self.root.path().join("dist")
    }

    /// Read `dist/<rel>` as UTF-8.
    pub fn read_out(&self, rel: &str) -> String {
        std::fs::read_to_string(self.out().join(rel)).expect("read output file")
    }

    /// Build options writing to `dist` under `env`.
    pub fn options(&self, env: &str) -> BuildOptions {
        BuildOptions {
            env: Some(BuildEnv::parse(env)),
            out: Some(PathBuf::from("dist")),
            ..BuildOptions::default()
        }
    }

    /// Compile with `vars` as the environment on `platform`.
    pub fn compile(
        &self,
        env: &str,
        vars: EnvSnapshot,
        platform: Platform,
        executor: Arc<RecordingExecutor>,
    ) -> Result<Arc<Logger>> {
        let log = Arc::new(Logger::new("test"));
        cep_bundler::commands::compile::compile(
            self.options(env),
            vars,
            self.root_path(),
            platform,
            &log,
            executor,
        )?;
        Ok(log)
    }
}

/// Fluent builder for [`TestProject`].
pub struct ProjectBuilder {
    project: TestProject,
    package: serde_json::Value,
}

impl ProjectBuilder {
    /// Begin with `{"name": "panel", "version": "1.0.0"}`.
    pub fn new() -> Self {
        Self {
            project: TestProject {
                root: tempfile::tempdir().expect("create temp dir"),
            },
            package: serde_json::json!({ "name": "panel", "version": "1.0.0" }),
        }
    }

    /// Set the `cep` section of `package.json`.
    pub fn with_cep(mut self, cep: serde_json::Value) -> Self {
        self.package["cep"] = cep;
        self
    }

    /// Add a runtime dependency of the project.
    pub fn with_dependency(mut self, name: &str) -> Self {
        self.package["dependencies"][name] = serde_json::json!("*");
        self
    }

    /// Install `node_modules/<name>` with its own runtime `deps`.
    pub fn with_module(self, name: &str, deps: &[&str]) -> Self {
        let dir = self.project.root.path().join("node_modules").join(name);
        std::fs::create_dir_all(&dir).expect("create module dir");
        let dependencies: serde_json::Map<String, serde_json::Value> = deps
            .iter()
            .map(|d| ((*d).to_string(), serde_json::json!("*")))
            .collect();
        let manifest = serde_json::json!({ "name": name, "dependencies": dependencies });
        std::fs::write(dir.join("package.json"), manifest.to_string()).expect("write module manifest");
        std::fs::write(dir.join("index.js"), format!("module.exports = '{name}';\n"))
            .expect("write module index");
        self
    }

    /// Write a file relative to the project root.
    pub fn with_file(self, rel: &str, contents: &str) -> Self {
        let path = self.project.root.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create file parent");
        }
        std::fs::write(path, contents).expect("write file");
        self
    }

    /// Write `package.json` and return the project.
    pub fn build(self) -> TestProject {
        std::fs::write(
            self.project.root.path().join("package.json"),
            serde_json::to_string_pretty(&self.package).expect("serialize package.json"),
        )
        .expect("write package.json");
        self.project
    }
}
