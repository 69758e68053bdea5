use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use housekeeper::daemon::{self, STOP_TIMEOUT};
use housekeeper::{paths, signal, Daemon, DaemonStatus, PidFile};

use super::load_config;
use crate::cli::DaemonCommand;

pub fn cmd_daemon(config_path: Option<&Path>, action: DaemonCommand) -> Result<ExitCode> {
    match action {
        DaemonCommand::Start => start(config_path),
        DaemonCommand::Stop => stop(),
        DaemonCommand::Status => status(),
        DaemonCommand::Run => run(config_path),
    }
}

fn start(config_path: Option<&Path>) -> Result<ExitCode> {
    // Fail here, not in the detached child, on a bad config
    load_config(config_path)?;

    let daemon = Daemon::from_env()?;
    if let DaemonStatus::Running(pid) = daemon.status() {
        println!("Daemon already running (PID {pid})");
        return Ok(ExitCode::FAILURE);
    }

    let pid = daemon.start(config_path)?;
    println!("Daemon started (PID {pid})");
    Ok(ExitCode::SUCCESS)
}

fn stop() -> Result<ExitCode> {
    if Daemon::from_env()?.stop(STOP_TIMEOUT)? {
        println!("Daemon stopped");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Daemon not running");
        Ok(ExitCode::FAILURE)
    }
}

fn status() -> Result<ExitCode> {
    match Daemon::from_env()?.status() {
        DaemonStatus::Running(pid) => {
            println!("Daemon running (PID {pid})");
            Ok(ExitCode::SUCCESS)
        }
        DaemonStatus::Stopped => {
            println!("Daemon not running");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?.with_env_overrides();
    let shutdown = signal::shutdown_channel()?;
    let pid_file = PidFile::new(paths::pid_file()?);

    daemon::run_until(&config, &pid_file, shutdown)?;
    Ok(ExitCode::SUCCESS)
}
