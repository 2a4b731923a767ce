//! `PostgreSQL` key store implementation.

use super::{models::ApiKeyRow, schema::api_keys};
use crate::access::{
    domain::{ApiKeyDigest, ApiKeyId, ApiKeyRecord, PersistedApiKeyData},
    ports::{ApiKeyStore, ApiKeyStoreError, ApiKeyStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type for key store adapters.
pub type KeyPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed key store.
#[derive(Debug, Clone)]
pub struct PostgresApiKeyStore {
    pool: KeyPgPool,
}

impl PostgresApiKeyStore {
    /// Creates a new key store from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: KeyPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> ApiKeyStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ApiKeyStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ApiKeyStoreError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(ApiKeyStoreError::persistence)?
    }
}

#[async_trait]
impl ApiKeyStore for PostgresApiKeyStore {
    async fn find_by_digest(
        &self,
        digest: &ApiKeyDigest,
    ) -> ApiKeyStoreResult<Option<ApiKeyRecord>> {
        let lookup = digest.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = api_keys::table
                .filter(api_keys::key_digest.eq(&lookup))
                .select(ApiKeyRow::as_select())
                .first::<ApiKeyRow>(connection)
                .optional()
                .map_err(ApiKeyStoreError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn touch_last_used(
        &self,
        digest: &ApiKeyDigest,
        used_at: DateTime<Utc>,
    ) -> ApiKeyStoreResult<()> {
        let lookup = digest.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::update(
                api_keys::table
                    .filter(api_keys::key_digest.eq(&lookup))
                    .filter(
                        api_keys::last_used_at
                            .is_null()
                            .or(api_keys::last_used_at.lt(used_at)),
                    ),
            )
            .set(api_keys::last_used_at.eq(Some(used_at)))
            .execute(connection)
            .map_err(ApiKeyStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn create(&self, record: &ApiKeyRecord) -> ApiKeyStoreResult<()> {
        let key_id = record.id();
        let row = to_row(record);
        self.run_blocking(move |connection| {
            diesel::insert_into(api_keys::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ApiKeyStoreError::DuplicateKey(key_id)
                    }
                    _ => ApiKeyStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn count(&self) -> ApiKeyStoreResult<u64> {
        self.run_blocking(move |connection| {
            let total = api_keys::table
                .count()
                .get_result::<i64>(connection)
                .map_err(ApiKeyStoreError::persistence)?;
            u64::try_from(total).map_err(ApiKeyStoreError::invalid_persisted_data)
        })
        .await
    }
}

fn to_row(record: &ApiKeyRecord) -> ApiKeyRow {
    ApiKeyRow {
        id: record.id().into_inner(),
        key_digest: record.digest().as_str().to_owned(),
        description: record.description().to_owned(),
        created_at: record.created_at(),
        last_used_at: record.last_used_at(),
    }
}

fn row_to_record(row: ApiKeyRow) -> ApiKeyStoreResult<ApiKeyRecord> {
    let digest =
        ApiKeyDigest::parse(&row.key_digest).map_err(ApiKeyStoreError::invalid_persisted_data)?;
    Ok(ApiKeyRecord::from_persisted(PersistedApiKeyData {
        id: ApiKeyId::from_uuid(row.id),
        digest,
        description: row.description,
        created_at: row.created_at,
        last_used_at: row.last_used_at,
    }))
}
