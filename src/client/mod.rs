//! HTTP client and interactive session used by the `docktrine` CLI.

mod api;
mod render;
mod session;
mod shell;

pub use api::{ApiClient, ClientConfig, ClientError, ClientResult};
pub use render::{render_container, render_containers, render_servers};
pub use session::CliSession;
pub use shell::{ContainerAction, SHELL_HELP, ShellCommand, ShellParseError};
