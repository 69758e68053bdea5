use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use housekeeper::targets;

use super::{config_write_path, load_config};
use crate::cli::DirsCommand;

pub fn cmd_dirs(config_path: Option<&Path>, action: DirsCommand) -> Result<ExitCode> {
    let mut config = load_config(config_path)?;

    match action {
        DirsCommand::List => {
            if config.directories.is_empty() {
                println!("No directories in config.");
            }
            for dir in &config.directories {
                println!("{}", dir.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        DirsCommand::Add { path } => {
            let resolved = targets::absolutize(&path, &std::env::current_dir()?);
            if !config.add_directory(&resolved) {
                println!("Already in config: {}", resolved.display());
                return Ok(ExitCode::FAILURE);
            }
            config.save(&config_write_path(config_path)?)?;
            println!("Added: {}", resolved.display());
            Ok(ExitCode::SUCCESS)
        }
        DirsCommand::Remove { path } => {
            let resolved = targets::absolutize(&path, &std::env::current_dir()?);
            if !config.remove_directory(&resolved) {
                println!("Not in config: {}", resolved.display());
                return Ok(ExitCode::FAILURE);
            }
            config.save(&config_write_path(config_path)?)?;
            println!("Removed: {}", resolved.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
