//! Plain-text rendering of API responses.

use crate::container::domain::NormalizedContainer;
use crate::http::ServerView;

/// Renders a container listing, one block per container.
#[must_use]
pub fn render_containers(containers: &[NormalizedContainer]) -> String {
    if containers.is_empty() {
        return String::from("No containers found\n");
    }
    containers
        .iter()
        .map(|container| {
            format!(
                "ID: {}\nName: {}\nImage: {}\nStatus: {}\n\n",
                short_id(&container.id),
                container.name,
                container.image,
                container.status
            )
        })
        .collect()
}

/// Renders one container with its ports and labels.
#[must_use]
pub fn render_container(container: &NormalizedContainer) -> String {
    let mut output = format!(
        "ID: {}\nName: {}\nImage: {}\nStatus: {}\nCreated: {}\n",
        container.id, container.name, container.image, container.status, container.created
    );
    for port in &container.ports {
        let published = port.public_port.map_or_else(String::new, |public| {
            format!("{}:{public} -> ", port.ip.as_deref().unwrap_or("0.0.0.0"))
        });
        output.push_str(&format!(
            "Port: {published}{}/{}\n",
            port.private_port, port.protocol
        ));
    }
    for (key, value) in &container.labels {
        output.push_str(&format!("Label: {key}={value}\n"));
    }
    output
}

/// Renders the server list.
#[must_use]
pub fn render_servers(servers: &[ServerView]) -> String {
    if servers.is_empty() {
        return String::from("No servers registered\n");
    }
    servers
        .iter()
        .map(|server| {
            let description = server
                .description
                .as_ref()
                .map(|text| format!("Description: {text}\n"))
                .unwrap_or_default();
            format!(
                "Name: {}\nHost: {}\nDefault: {}\n{description}\n",
                server.name, server.host, server.is_default
            )
        })
        .collect()
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
