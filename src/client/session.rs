//! Per-shell server selection.

use super::api::{ApiClient, ClientResult};

/// State carried across commands of one interactive session.
///
/// The selected server is passed explicitly to every call; nothing is stored
/// process-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliSession {
    server: Option<String>,
}

impl CliSession {
    /// Starts a session targeting `server`, or the default when `None`.
    #[must_use]
    pub fn new(server: Option<String>) -> Self {
        let mut session = Self::default();
        session.use_server(server.as_deref().unwrap_or_default());
        session
    }

    /// Switches the target server. A blank name or `default` selects the
    /// registry default.
    pub fn use_server(&mut self, name: &str) {
        let trimmed = name.trim();
        self.server = (!selects_default(trimmed)).then(|| trimmed.to_owned());
    }

    /// Switches to `name` once `client` confirms the server is registered.
    ///
    /// A blank name or `default` resets without a lookup. On error the
    /// current selection is kept.
    ///
    /// # Errors
    ///
    /// Returns the lookup's [`ClientError`](super::ClientError), such as a
    /// 404 for an unknown server.
    pub async fn switch_server(&mut self, client: &ApiClient, name: &str) -> ClientResult<()> {
        let trimmed = name.trim();
        if !selects_default(trimmed) {
            client.get_server(trimmed).await?;
        }
        self.use_server(trimmed);
        Ok(())
    }

    /// Returns the selected server, if any.
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// Returns the prompt shown before each command.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("docktrine({})> ", self.server().unwrap_or("default"))
    }
}

fn selects_default(name: &str) -> bool {
    name.is_empty() || name == "default"
}
