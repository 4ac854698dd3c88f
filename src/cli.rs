use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::options::{BuildEnv, BuildOptions};

/// Top-level CLI entry point for the CEP extension bundler.
#[derive(Parser, Debug)]
#[command(
    name = "cep-bundler",
    about = "Package web builds as Adobe CEP extensions",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Project root containing package.json (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the extension into the output folder
    Compile(CompileOpts),
    /// Print the resolved configuration as KEY=VALUE lines
    Env,
    /// Remove the extension link from the host extensions folder
    Unlink(UnlinkOpts),
    /// Toggle PlayerDebugMode for every CSXS runtime
    DebugMode {
        #[command(subcommand)]
        action: DebugModeAction,
    },
    /// Print version information
    Version,
}

/// Options for the `compile` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompileOpts {
    /// Build environment (development, production, ...); defaults to NODE_ENV
    #[arg(long)]
    pub env: Option<String>,

    /// Output folder, relative to the project root
    #[arg(short, long, default_value = "dist")]
    pub out: PathBuf,

    /// Bundled page that panel.html opens in production
    #[arg(long = "html")]
    pub html_filename: Option<String>,

    /// Dev server port that panel.html opens in development
    #[arg(long = "port")]
    pub dev_port: Option<u16>,

    /// Do not link the output into the extensions folder
    #[arg(long)]
    pub no_symlink: bool,
}

impl CompileOpts {
    /// Build options for a project at `root` (`None` means the current directory).
    #[must_use]
    pub fn build_options(&self, root: Option<PathBuf>) -> BuildOptions {
        BuildOptions {
            env: self.env.as_deref().map(BuildEnv::parse),
            root,
            out: Some(self.out.clone()),
            html_filename: self.html_filename.clone(),
            dev_port: self.dev_port,
            pkg: None,
            no_symlink: self.no_symlink,
        }
    }
}

/// Options for the `unlink` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UnlinkOpts {
    /// Output folder the link was created for
    #[arg(short, long, default_value = "dist")]
    pub out: PathBuf,

    /// Also turn PlayerDebugMode off
    #[arg(long)]
    pub disable_debug: bool,
}

/// `debug-mode` actions.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugModeAction {
    /// Set PlayerDebugMode for every runtime
    Enable,
    /// Clear PlayerDebugMode for every runtime
    Disable,
    /// Report how many runtimes have PlayerDebugMode set
    Status,
}
