//! Unit tests for the container module.


use crate::container::{
    domain::{ContainerStateSnapshot, PortMapping},
    ports::ContainerInspection,
};
use std::collections::BTreeMap;

/// Builds an inspection for a container created from `image`.
fn inspection(id: &str, name: &str, image: &str, running: bool) -> ContainerInspection {
    ContainerInspection {
        id: id.to_owned(),
        name: format!("/{name}"),
        configured_image: Some(image.to_owned()),
        image_id: format!("sha256:{id}"),
        state: ContainerStateSnapshot {
            status: if running { "running" } else { "exited" }.to_owned(),
            running,
            exit_code: Some(0),
            ..ContainerStateSnapshot::default()
        },
        created: String::from("2024-05-01T10:00:00Z"),
        ports: vec![PortMapping {
            ip: Some(String::from("0.0.0.0")),
            private_port: 80,
            public_port: Some(8080),
            protocol: String::from("tcp"),
        }],
        labels: BTreeMap::from([(String::from("tier"), String::from("web"))]),
    }
}
