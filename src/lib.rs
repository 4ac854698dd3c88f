//! Adobe CEP extension bundler.
//!
//! Turns a web build into an extension folder the Creative Cloud host
//! applications can load: `CSXS/manifest.xml`, an optional `.debug`
//! descriptor, a `panel.html` entry page, runtime `node_modules`, and icons.
//! Development builds are also linked into the host extensions folder with
//! `PlayerDebugMode` switched on.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: layered settings from `CEP_*` variables and `package.json`
//! - **[`resources`]**: idempotent `check + apply` primitives (links, debug flag)
//! - **[`tasks`]**: named compile steps wired to resources and [`templates`]
//! - **[`commands`]**: subcommand orchestration (`compile`, `env`, `unlink`, `debug-mode`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod resources;
pub mod tasks;
pub mod templates;
