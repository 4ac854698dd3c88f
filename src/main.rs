//! `cep-bundler` binary: parses the command line and dispatches to
//! [`cep_bundler::commands`].
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use cep_bundler::cli::{self, Command};
use cep_bundler::commands;
use cep_bundler::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = match &args.command {
        Command::Compile(_) => "compile",
        Command::Env => "env",
        Command::Unlink(_) => "unlink",
        Command::DebugMode { .. } => "debug-mode",
        Command::Version => "version",
    };
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(Logger::new(command));

    match args.command {
        Command::Compile(opts) => commands::compile::run(&args.global, &opts, &log),
        Command::Env => commands::env::run(&args.global),
        Command::Unlink(opts) => commands::unlink::run(&args.global, &opts, &log),
        Command::DebugMode { action } => commands::debug_mode::run(action, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
