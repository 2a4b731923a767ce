//! Command grammar for the interactive shell.

use thiserror::Error;

/// Container operation requested from the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerAction {
    /// List containers.
    List,
    /// Show one container.
    Get(String),
    /// Start a container.
    Start(String),
    /// Stop a container.
    Stop(String),
    /// Restart a container.
    Restart {
        /// Container ID or name.
        id: String,
        /// Pull the image before restarting.
        pull_latest: bool,
    },
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,
    /// Switch the session's server.
    Use(String),
    /// Show the session's server.
    ShowServer,
    /// Run a container operation against the session's server.
    Containers(ContainerAction),
    /// List servers.
    ListServers,
    /// Show one server.
    GetServer(String),
    /// Register a server.
    AddServer {
        /// Server name.
        name: String,
        /// Daemon host URI.
        host: String,
        /// Mark as default.
        is_default: bool,
    },
    /// Remove a server.
    RemoveServer(String),
    /// Print usage.
    Help,
    /// Leave the shell.
    Exit,
}

/// Shell usage text.
pub const SHELL_HELP: &str = "\
Available commands:
  use <server>                            - Switch server ('default' resets)
  server                                  - Show current server
  containers list                         - List all containers
  containers get <id>                     - Show a container
  containers start <id>                   - Start a container
  containers stop <id>                    - Stop a container
  containers restart <id> [--pull-latest] - Restart a container
  servers list                            - List all servers
  servers get <name>                      - Show a server
  servers add <name> <host> [--default]   - Add a new server
  servers remove <name>                   - Remove a server
  help                                    - Show this help
  exit                                    - Leave the shell";

/// Shell parse errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellParseError {
    /// The first word is not a command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command was used with the wrong arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl ShellCommand {
    /// Parses one line of shell input.
    ///
    /// # Errors
    ///
    /// Returns [`ShellParseError`] for unknown commands or bad arguments.
    pub fn parse(line: &str) -> Result<Self, ShellParseError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Ok(Self::Empty),
            ["exit" | "quit"] => Ok(Self::Exit),
            ["help"] => Ok(Self::Help),
            ["server"] => Ok(Self::ShowServer),
            ["use", name] => Ok(Self::Use((*name).to_owned())),
            ["use", ..] => Err(ShellParseError::Usage("use <server>")),
            ["containers", rest @ ..] => parse_containers(rest).map(Self::Containers),
            ["servers", rest @ ..] => parse_servers(rest),
            [other, ..] => Err(ShellParseError::UnknownCommand((*other).to_owned())),
        }
    }
}

fn parse_containers(words: &[&str]) -> Result<ContainerAction, ShellParseError> {
    match words {
        ["list"] => Ok(ContainerAction::List),
        ["get", id] => Ok(ContainerAction::Get((*id).to_owned())),
        ["start", id] => Ok(ContainerAction::Start((*id).to_owned())),
        ["stop", id] => Ok(ContainerAction::Stop((*id).to_owned())),
        ["restart", id] => Ok(ContainerAction::Restart {
            id: (*id).to_owned(),
            pull_latest: false,
        }),
        ["restart", id, "--pull-latest"] | ["restart", "--pull-latest", id] => {
            Ok(ContainerAction::Restart {
                id: (*id).to_owned(),
                pull_latest: true,
            })
        }
        _ => Err(ShellParseError::Usage(
            "containers list | get <id> | start <id> | stop <id> | restart <id> [--pull-latest]",
        )),
    }
}

fn parse_servers(words: &[&str]) -> Result<ShellCommand, ShellParseError> {
    match words {
        ["list"] => Ok(ShellCommand::ListServers),
        ["get", name] => Ok(ShellCommand::GetServer((*name).to_owned())),
        ["remove", name] => Ok(ShellCommand::RemoveServer((*name).to_owned())),
        ["add", name, host] => Ok(ShellCommand::AddServer {
            name: (*name).to_owned(),
            host: (*host).to_owned(),
            is_default: false,
        }),
        ["add", name, host, "--default"] => Ok(ShellCommand::AddServer {
            name: (*name).to_owned(),
            host: (*host).to_owned(),
            is_default: true,
        }),
        _ => Err(ShellParseError::Usage(
            "servers list | get <name> | add <name> <host> [--default] | remove <name>",
        )),
    }
}
