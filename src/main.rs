//! Housekeeper CLI - get notified about new files and directories
//!
//! Usage: housekeeper [--only] [DIR...]
//!
//! Commands:
//!   dirs    Manage configured directories
//!   daemon  Manage the background daemon
//!   agent   Manage the macOS login agent

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands, DaemonCommand};
use housekeeper::logging::{self, LogGuard, LogOptions};
use housekeeper::{paths, HousekeeperError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let detached = matches!(
        cli.command,
        Some(Commands::Daemon {
            action: DaemonCommand::Run
        })
    );

    let _guard = match init_logging(cli.verbose, detached) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match commands::dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            if detached {
                tracing::error!("{e:#}");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, detached: bool) -> Result<LogGuard> {
    if detached {
        return Ok(logging::init(LogOptions::daemon(verbose, paths::log_dir()?))?);
    }

    // The log file is optional for foreground commands
    match logging::init(LogOptions::interactive(verbose, paths::log_dir().ok())) {
        Ok(guard) => Ok(guard),
        Err(HousekeeperError::Io(_)) => Ok(logging::init(LogOptions::interactive(verbose, None))?),
        Err(e) => Err(e.into()),
    }
}
