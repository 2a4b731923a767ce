//! Service layer for container lifecycle operations.
//!
//! Each operation resolves a fresh connection, performs one daemon
//! interaction and drops the connection before returning.

use super::resolver::{DaemonClientResolver, ResolveError, ResolvedConnection, ServerSelection};
use crate::container::{
    domain::{ContainerDomainError, ContainerRef, NormalizedContainer},
    ports::{ContainerInspection, DaemonConnector, DaemonError},
};
use crate::error::ErrorKind;
use crate::server_registry::ports::ServerRegistryRepository;
use thiserror::Error;

/// Service-level errors for container operations.
#[derive(Debug, Error)]
pub enum ContainerServiceError {
    /// The container reference was invalid.
    #[error(transparent)]
    InvalidArgument(#[from] ContainerDomainError),

    /// No connection could be established.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The daemon has no such container.
    #[error("container {0} not found")]
    NotFound(String),

    /// The daemon rejected or failed the operation.
    #[error("daemon error: {0}")]
    Upstream(#[source] DaemonError),

    /// Pulling the container's image failed, so it was not restarted.
    #[error("failed to pull image {image}: {source}")]
    Pull {
        /// Image reference that was pulled.
        image: String,
        /// Underlying daemon failure.
        source: DaemonError,
    },

    /// A pull was requested but the container has no configured image.
    #[error("container {0} has no image reference to pull")]
    MissingImage(String),
}

impl ContainerServiceError {
    /// Classifies the error for façade rendering.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Resolve(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Pull { .. } | Self::MissingImage(_) => ErrorKind::Pull,
        }
    }

    fn from_daemon(err: DaemonError) -> Self {
        match err {
            DaemonError::NoSuchContainer(container) => Self::NotFound(container),
            other => Self::Upstream(other),
        }
    }
}

/// Result type for container service operations.
pub type ContainerServiceResult<T> = Result<T, ContainerServiceError>;

/// Container lifecycle orchestration service.
pub struct ContainerLifecycleService<R, D>
where
    R: ServerRegistryRepository,
    D: DaemonConnector,
{
    resolver: DaemonClientResolver<R, D>,
}

impl<R, D> Clone for ContainerLifecycleService<R, D>
where
    R: ServerRegistryRepository,
    D: DaemonConnector,
{
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<R, D> ContainerLifecycleService<R, D>
where
    R: ServerRegistryRepository,
    D: DaemonConnector,
{
    /// Creates a lifecycle service over a resolver.
    #[must_use]
    pub const fn new(resolver: DaemonClientResolver<R, D>) -> Self {
        Self { resolver }
    }

    /// Returns the resolver used by this service.
    #[must_use]
    pub const fn resolver(&self) -> &DaemonClientResolver<R, D> {
        &self.resolver
    }

    async fn connect(&self, server: Option<&str>) -> ContainerServiceResult<ResolvedConnection> {
        Ok(self
            .resolver
            .resolve(ServerSelection::from_param(server))
            .await?)
    }

    /// Lists all containers, running or not, on the selected server.
    ///
    /// Containers whose inspection fails are left out.
    ///
    /// # Errors
    ///
    /// Returns resolution errors, or [`ContainerServiceError::Upstream`] when
    /// the listing itself fails.
    pub async fn list(
        &self,
        server: Option<&str>,
    ) -> ContainerServiceResult<Vec<NormalizedContainer>> {
        let connection = self.connect(server).await?;
        let session = connection.session();
        let listings = session
            .list_containers(true)
            .await
            .map_err(ContainerServiceError::Upstream)?;

        let mut containers = Vec::with_capacity(listings.len());
        for listing in listings {
            match session.inspect_container(&listing.id).await {
                Ok(inspection) => {
                    let mut container = normalize(inspection);
                    container.ports = listing.ports;
                    containers.push(container);
                }
                Err(err) => {
                    tracing::debug!(container = %listing.id, error = %err, "skipping container");
                }
            }
        }
        Ok(containers)
    }

    /// Inspects one container.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerServiceError::InvalidArgument`] for a blank
    /// reference, resolution errors, [`ContainerServiceError::NotFound`] or
    /// [`ContainerServiceError::Upstream`].
    pub async fn get(
        &self,
        container_ref: &str,
        server: Option<&str>,
    ) -> ContainerServiceResult<NormalizedContainer> {
        let container = ContainerRef::new(container_ref)?;
        let connection = self.connect(server).await?;
        let inspection = connection
            .session()
            .inspect_container(container.as_str())
            .await
            .map_err(ContainerServiceError::from_daemon)?;
        Ok(normalize(inspection))
    }

    /// Starts a container.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn start(
        &self,
        container_ref: &str,
        server: Option<&str>,
    ) -> ContainerServiceResult<()> {
        let container = ContainerRef::new(container_ref)?;
        let connection = self.connect(server).await?;
        connection
            .session()
            .start_container(container.as_str())
            .await
            .map_err(ContainerServiceError::from_daemon)?;
        tracing::debug!(container = %container, server = %connection.server().name(), "started");
        Ok(())
    }

    /// Stops a container.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn stop(
        &self,
        container_ref: &str,
        server: Option<&str>,
    ) -> ContainerServiceResult<()> {
        let container = ContainerRef::new(container_ref)?;
        let connection = self.connect(server).await?;
        connection
            .session()
            .stop_container(container.as_str())
            .await
            .map_err(ContainerServiceError::from_daemon)?;
        tracing::debug!(container = %container, server = %connection.server().name(), "stopped");
        Ok(())
    }

    /// Restarts a container, optionally pulling its image first.
    ///
    /// A failed pull aborts before the restart is attempted. A successful
    /// pull is not undone when the restart then fails.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`], plus [`ContainerServiceError::Pull`] and
    /// [`ContainerServiceError::MissingImage`] when refreshing fails.
    pub async fn restart(
        &self,
        container_ref: &str,
        server: Option<&str>,
        pull_latest: bool,
    ) -> ContainerServiceResult<()> {
        let container = ContainerRef::new(container_ref)?;
        let connection = self.connect(server).await?;
        let plan = RestartPlan {
            connection: &connection,
            container: &container,
        };

        let ready = if pull_latest {
            plan.refresh_image().await?
        } else {
            plan.skip_refresh()
        };
        ready.restart().await?;
        tracing::debug!(
            container = %container,
            server = %connection.server().name(),
            pull_latest,
            "restarted"
        );
        Ok(())
    }
}

/// First phase of a restart: the image may be refreshed.
struct RestartPlan<'a> {
    connection: &'a ResolvedConnection,
    container: &'a ContainerRef,
}

/// Second phase of a restart. Only reachable through [`RestartPlan`].
struct ReadyToRestart<'a> {
    connection: &'a ResolvedConnection,
    container: &'a ContainerRef,
}

impl<'a> RestartPlan<'a> {
    const fn skip_refresh(self) -> ReadyToRestart<'a> {
        ReadyToRestart {
            connection: self.connection,
            container: self.container,
        }
    }

    async fn refresh_image(self) -> ContainerServiceResult<ReadyToRestart<'a>> {
        let session = self.connection.session();
        let inspection = session
            .inspect_container(self.container.as_str())
            .await
            .map_err(ContainerServiceError::from_daemon)?;
        let image = inspection
            .configured_image
            .ok_or_else(|| ContainerServiceError::MissingImage(self.container.to_string()))?;

        session
            .pull_image(&image)
            .await
            .map_err(|source| ContainerServiceError::Pull {
                image: image.clone(),
                source,
            })?;
        tracing::debug!(container = %self.container, image = %image, "refreshed image");
        Ok(self.skip_refresh())
    }
}

impl ReadyToRestart<'_> {
    async fn restart(self) -> ContainerServiceResult<()> {
        self.connection
            .session()
            .restart_container(self.container.as_str())
            .await
            .map_err(ContainerServiceError::from_daemon)
    }
}

fn normalize(inspection: ContainerInspection) -> NormalizedContainer {
    let ContainerInspection {
        id,
        name,
        configured_image,
        image_id,
        state,
        created,
        ports,
        labels,
    } = inspection;

    NormalizedContainer {
        id,
        name: name.trim_start_matches('/').to_owned(),
        image: configured_image.unwrap_or_else(|| image_id.clone()),
        image_id,
        status: state.status.clone(),
        state,
        created,
        ports,
        labels,
    }
}
