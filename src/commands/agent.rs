use std::process::ExitCode;

use anyhow::Result;

use housekeeper::agent::LaunchAgent;

use crate::cli::AgentCommand;

pub fn cmd_agent(action: AgentCommand) -> Result<ExitCode> {
    let agent = LaunchAgent::from_env()?;

    match action {
        AgentCommand::Install => {
            agent.install()?;
            println!("Login agent installed: {}", agent.plist_path().display());
            Ok(ExitCode::SUCCESS)
        }
        AgentCommand::Uninstall => {
            if agent.uninstall()? {
                println!("Login agent removed");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Login agent not installed");
                Ok(ExitCode::FAILURE)
            }
        }
        AgentCommand::Status => {
            let loaded = agent.is_loaded()?;
            if !agent.is_installed() {
                println!("Login agent not installed");
                return Ok(ExitCode::FAILURE);
            }
            let state = if loaded { "loaded" } else { "not loaded" };
            println!("Login agent installed ({state})");
            Ok(ExitCode::SUCCESS)
        }
    }
}
