//! Docktrine command-line client.
//!
//! Talks to a running `docktrine-api` over HTTP. Every command accepts a
//! `--server` selection; the `shell` subcommand keeps that selection in a
//! [`CliSession`] updated by `use <server>`.

use clap::{Parser, Subcommand};
use docktrine::client::{
    ApiClient, CliSession, ClientConfig, ContainerAction, SHELL_HELP, ShellCommand,
    render_container, render_containers, render_servers,
};
use docktrine::http::CreateServerBody;
use docktrine::telemetry;
use eyre::WrapErr;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

const LOG_FILTER: &str = "warn";

/// Command-line arguments for the client.
#[derive(Debug, Parser)]
#[command(name = "docktrine", version, about = "Manage containers across Docker servers")]
struct Cli {
    /// Base URL of the Docktrine API.
    #[arg(long, env = "DOCKTRINE_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// API key sent in the `X-API-Key` header.
    #[arg(long, env = "DOCKTRINE_API_KEY", default_value = "")]
    api_key: String,

    /// Server to target; the registry default when omitted.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Container operations.
    #[command(subcommand)]
    Containers(ContainerCommand),
    /// Server registry operations.
    #[command(subcommand)]
    Servers(ServerCommand),
    /// Interactive session.
    Shell,
}

#[derive(Debug, Subcommand)]
enum ContainerCommand {
    /// List all containers, including stopped ones.
    List,
    /// Show one container.
    Get {
        /// Container ID or name.
        id: String,
    },
    /// Start a container.
    Start {
        /// Container ID or name.
        id: String,
    },
    /// Stop a container.
    Stop {
        /// Container ID or name.
        id: String,
    },
    /// Restart a container.
    Restart {
        /// Container ID or name.
        id: String,
        /// Pull the container's image before restarting.
        #[arg(long)]
        pull_latest: bool,
    },
}

impl From<ContainerCommand> for ContainerAction {
    fn from(command: ContainerCommand) -> Self {
        match command {
            ContainerCommand::List => Self::List,
            ContainerCommand::Get { id } => Self::Get(id),
            ContainerCommand::Start { id } => Self::Start(id),
            ContainerCommand::Stop { id } => Self::Stop(id),
            ContainerCommand::Restart { id, pull_latest } => Self::Restart { id, pull_latest },
        }
    }
}

#[derive(Debug, Subcommand)]
enum ServerCommand {
    /// List registered servers.
    List,
    /// Show one server.
    Get {
        /// Server name.
        name: String,
    },
    /// Register a server.
    Add {
        /// Unique server name.
        name: String,
        /// Daemon host URI, e.g. `tcp://10.0.0.5:2375`.
        host: String,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Make this the default server.
        #[arg(long)]
        default: bool,
    },
    /// Remove a server.
    Remove {
        /// Server name.
        name: String,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    telemetry::init(LOG_FILTER).wrap_err("failed to install log subscriber")?;

    let cli = Cli::parse();
    let client = ApiClient::new(ClientConfig::new(&cli.api_url, &cli.api_key)?);
    let mut session = CliSession::new(cli.server);

    match cli.command {
        Commands::Containers(command) => {
            let output = run_container_action(&client, &session, command.into()).await?;
            emit(&output)
        }
        Commands::Servers(command) => {
            let output = run_server_command(&client, command).await?;
            emit(&output)
        }
        Commands::Shell => run_shell(&client, &mut session).await,
    }
}

async fn run_container_action(
    client: &ApiClient,
    session: &CliSession,
    action: ContainerAction,
) -> eyre::Result<String> {
    let server = session.server();
    let output = match action {
        ContainerAction::List => render_containers(&client.list_containers(server).await?),
        ContainerAction::Get(id) => render_container(&client.get_container(&id, server).await?),
        ContainerAction::Start(id) => client.start_container(&id, server).await? + "\n",
        ContainerAction::Stop(id) => client.stop_container(&id, server).await? + "\n",
        ContainerAction::Restart { id, pull_latest } => {
            client.restart_container(&id, server, pull_latest).await? + "\n"
        }
    };
    Ok(output)
}

async fn run_server_command(client: &ApiClient, command: ServerCommand) -> eyre::Result<String> {
    let output = match command {
        ServerCommand::List => render_servers(&client.list_servers().await?),
        ServerCommand::Get { name } => render_servers(&[client.get_server(&name).await?]),
        ServerCommand::Add {
            name,
            host,
            description,
            default,
        } => {
            let created = client
                .add_server(&CreateServerBody {
                    name,
                    host,
                    description,
                    is_default: default,
                })
                .await?;
            format!("Server {} added successfully\n", created.name)
        }
        ServerCommand::Remove { name } => client.remove_server(&name).await? + "\n",
    };
    Ok(output)
}

async fn run_shell(client: &ApiClient, session: &mut CliSession) -> eyre::Result<()> {
    emit("Docktrine interactive shell. Type 'help' for commands.\n")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        emit(&session.prompt())?;
        let Some(line) = lines.next_line().await? else {
            return emit("\n");
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                emit(&format!("{err}\n"))?;
                continue;
            }
        };

        let outcome = match command {
            ShellCommand::Exit => return Ok(()),
            ShellCommand::Empty => Ok(String::new()),
            ShellCommand::Help => Ok(format!("{SHELL_HELP}\n")),
            ShellCommand::ShowServer => Ok(format!(
                "Current server: {}\n",
                session.server().unwrap_or("default")
            )),
            ShellCommand::Use(name) => session
                .switch_server(client, &name)
                .await
                .map(|()| {
                    format!(
                        "Using server: {}\n",
                        session.server().unwrap_or("default")
                    )
                })
                .map_err(eyre::Report::from),
            ShellCommand::Containers(action) => {
                run_container_action(client, session, action).await
            }
            ShellCommand::ListServers => run_server_command(client, ServerCommand::List).await,
            ShellCommand::GetServer(name) => {
                run_server_command(client, ServerCommand::Get { name }).await
            }
            ShellCommand::AddServer {
                name,
                host,
                is_default,
            } => {
                run_server_command(
                    client,
                    ServerCommand::Add {
                        name,
                        host,
                        description: None,
                        default: is_default,
                    },
                )
                .await
            }
            ShellCommand::RemoveServer(name) => {
                run_server_command(client, ServerCommand::Remove { name }).await
            }
        };

        // Command failures are reported and the session continues.
        match outcome {
            Ok(output) => emit(&output)?,
            Err(err) => emit(&format!("Error: {err}\n"))?,
        }
    }
}

fn emit(text: &str) -> eyre::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
