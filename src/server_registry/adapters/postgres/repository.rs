//! `PostgreSQL` repository implementation for server descriptors.

use super::{
    models::{NewServerRow, ServerRow},
    schema::docker_servers,
};
use crate::server_registry::{
    domain::{DaemonHost, PersistedServerData, ServerDescriptor, ServerId, ServerName},
    ports::{ServerRegistryError, ServerRegistryRepository, ServerRegistryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type for server registry adapters.
pub type ServerPgPool = Pool<ConnectionManager<PgConnection>>;

/// Held until commit so concurrent default creates flip the flag one at a
/// time instead of racing on `idx_docker_servers_single_default`.
const LOCK_FOR_DEFAULT_FLIP: &str = "LOCK TABLE docker_servers IN SHARE ROW EXCLUSIVE MODE";

/// `PostgreSQL`-backed repository for server descriptors.
#[derive(Debug, Clone)]
pub struct PostgresServerRegistry {
    pool: ServerPgPool,
}

impl PostgresServerRegistry {
    /// Creates a new repository from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: ServerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> ServerRegistryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ServerRegistryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ServerRegistryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(ServerRegistryError::persistence)?
    }
}

#[async_trait]
impl ServerRegistryRepository for PostgresServerRegistry {
    async fn list_all(&self) -> ServerRegistryResult<Vec<ServerDescriptor>> {
        self.run_blocking(move |connection| {
            let rows = docker_servers::table
                .order(docker_servers::name.asc())
                .select(ServerRow::as_select())
                .load::<ServerRow>(connection)
                .map_err(ServerRegistryError::persistence)?;
            rows.into_iter().map(row_to_server).collect()
        })
        .await
    }

    async fn find_by_name(
        &self,
        name: &ServerName,
    ) -> ServerRegistryResult<Option<ServerDescriptor>> {
        let lookup = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = docker_servers::table
                .filter(docker_servers::name.eq(&lookup))
                .select(ServerRow::as_select())
                .first::<ServerRow>(connection)
                .optional()
                .map_err(ServerRegistryError::persistence)?;
            row.map(row_to_server).transpose()
        })
        .await
    }

    async fn find_default(&self) -> ServerRegistryResult<Option<ServerDescriptor>> {
        self.run_blocking(move |connection| {
            let row = docker_servers::table
                .filter(docker_servers::is_default.eq(true))
                .select(ServerRow::as_select())
                .first::<ServerRow>(connection)
                .optional()
                .map_err(ServerRegistryError::persistence)?;
            row.map(row_to_server).transpose()
        })
        .await
    }

    async fn create(&self, server: &ServerDescriptor) -> ServerRegistryResult<()> {
        let server_id = server.id();
        let server_name = server.name().clone();
        let new_row = to_new_row(server);

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|transaction| {
                    if new_row.is_default {
                        diesel::sql_query(LOCK_FOR_DEFAULT_FLIP).execute(transaction)?;
                        diesel::update(
                            docker_servers::table.filter(docker_servers::is_default.eq(true)),
                        )
                        .set((
                            docker_servers::is_default.eq(false),
                            docker_servers::updated_at.eq(new_row.created_at),
                        ))
                        .execute(transaction)?;
                    }

                    diesel::insert_into(docker_servers::table)
                        .values(&new_row)
                        .execute(transaction)?;
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_name_unique_violation(info.as_ref()) =>
                    {
                        ServerRegistryError::DuplicateServerName(server_name.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_primary_key_violation(info.as_ref()) =>
                    {
                        ServerRegistryError::DuplicateServer(server_id)
                    }
                    _ => ServerRegistryError::persistence(err),
                })
        })
        .await
    }

    async fn delete(&self, name: &ServerName) -> ServerRegistryResult<()> {
        let server_name = name.clone();
        self.run_blocking(move |connection| {
            let deleted_count = diesel::delete(
                docker_servers::table.filter(docker_servers::name.eq(server_name.as_str())),
            )
            .execute(connection)
            .map_err(ServerRegistryError::persistence)?;

            if deleted_count == 0 {
                return Err(ServerRegistryError::NotFound(server_name));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(server: &ServerDescriptor) -> NewServerRow {
    NewServerRow {
        id: server.id().into_inner(),
        name: server.name().as_str().to_owned(),
        host: server.host().as_str().to_owned(),
        description: server.description().map(str::to_owned),
        is_default: server.is_default(),
        created_at: server.created_at(),
        updated_at: server.updated_at(),
    }
}

fn row_to_server(row: ServerRow) -> ServerRegistryResult<ServerDescriptor> {
    let ServerRow {
        id,
        name,
        host,
        description,
        is_default,
        created_at,
        updated_at,
    } = row;

    let data = PersistedServerData {
        id: ServerId::from_uuid(id),
        name: ServerName::new(name).map_err(ServerRegistryError::invalid_persisted_data)?,
        host: DaemonHost::new(host).map_err(ServerRegistryError::invalid_persisted_data)?,
        description,
        is_default,
        created_at,
        updated_at,
    };

    Ok(ServerDescriptor::from_persisted(data))
}

fn is_name_unique_violation(info: &dyn diesel::result::DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_docker_servers_name")
}

fn is_primary_key_violation(info: &dyn diesel::result::DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "docker_servers_pkey")
}
