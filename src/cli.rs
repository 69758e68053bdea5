use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Housekeeper - get notified about new files and directories
#[derive(Parser, Debug)]
#[command(name = "housekeeper")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'housekeeper' without a command to watch in the foreground.")]
pub struct Cli {
    /// Path to config file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print events as JSON lines on stdout
    #[arg(long)]
    pub json: bool,

    /// Watch only the given directories (or the current one), ignoring defaults and config
    #[arg(long)]
    pub only: bool,

    /// Additional directories to watch
    #[arg(value_name = "DIR")]
    pub directories: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configured directories
    Dirs {
        #[command(subcommand)]
        action: DirsCommand,
    },

    /// Manage the background daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonCommand,
    },

    /// Manage the macOS login agent
    Agent {
        #[command(subcommand)]
        action: AgentCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DirsCommand {
    /// List directories from config
    List,
    /// Add directory to config
    Add {
        /// Directory path to add
        path: PathBuf,
    },
    /// Remove directory from config
    Remove {
        /// Directory path to remove
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DaemonCommand {
    /// Start daemon
    Start,
    /// Stop daemon
    Stop,
    /// Show daemon status
    Status,
    /// Run the daemon in the foreground (used by `start` and the login agent)
    #[command(hide = true)]
    Run,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AgentCommand {
    /// Start the daemon at login
    Install,
    /// Remove the login agent
    Uninstall,
    /// Show whether the login agent is installed and loaded
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_no_subcommand_watches() {
        let cli = Cli::try_parse_from(["housekeeper"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.only);
        assert!(!cli.json);
        assert!(cli.directories.is_empty());
    }

    #[test]
    fn test_cli_parse_watch_arguments() {
        let cli =
            Cli::try_parse_from(["housekeeper", "--only", "--json", "/tmp/a", "/tmp/b"]).unwrap();
        assert!(cli.only);
        assert!(cli.json);
        assert_eq!(
            cli.directories,
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]
        );
    }

    #[test]
    fn test_cli_parse_dirs_add() {
        let cli = Cli::try_parse_from(["housekeeper", "dirs", "add", "/tmp/x"]).unwrap();
        match cli.command {
            Some(Commands::Dirs { action }) => {
                assert_eq!(action, DirsCommand::Add { path: PathBuf::from("/tmp/x") })
            }
            other => panic!("Expected Dirs command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["housekeeper", "daemon", "start", "--config", "/etc/hk.toml", "-vv"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/hk.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Commands::Daemon { action: DaemonCommand::Start })
        ));
    }

    #[test]
    fn test_cli_parse_hidden_daemon_run() {
        let cli = Cli::try_parse_from(["housekeeper", "daemon", "run"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Daemon { action: DaemonCommand::Run })
        ));
    }

    #[test]
    fn test_cli_parse_global_config_before_subcommand() {
        let cli = Cli::try_parse_from(["housekeeper", "--config", "/etc/hk.toml", "dirs", "list"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/hk.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Dirs { action: DirsCommand::List })
        ));
    }

    #[test]
    fn test_cli_dirs_requires_action() {
        assert!(Cli::try_parse_from(["housekeeper", "dirs"]).is_err());
    }
}
