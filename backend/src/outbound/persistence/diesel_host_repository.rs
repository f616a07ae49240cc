//! PostgreSQL-backed [`HostRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, HostPersistenceError, HostRepository,
};
use crate::domain::{Hostname, NewHost, RecordId};

use super::DieselAccountRepository;
use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::NewHostRow;
use super::pool::{DbPool, PoolError};
use super::schema::hosts;

/// Host rows in the `hosts` table.
///
/// Owner existence is answered by the account repository over the same pool.
#[derive(Clone)]
pub struct DieselHostRepository {
    pool: DbPool,
    accounts: DieselAccountRepository,
}

impl DieselHostRepository {
    pub fn new(pool: DbPool) -> Self {
        let accounts = DieselAccountRepository::new(pool.clone());
        Self { pool, accounts }
    }
}

fn map_pool_error(error: PoolError) -> HostPersistenceError {
    HostPersistenceError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> HostPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation(constraint) => HostPersistenceError::duplicate(constraint),
        DieselFailure::ForeignKeyViolation(constraint) => {
            HostPersistenceError::missing_owner(constraint)
        }
        DieselFailure::Connection(message) => HostPersistenceError::connection(message),
        DieselFailure::Query(message) => HostPersistenceError::query(message),
    }
}

fn map_account_error(error: AccountPersistenceError) -> HostPersistenceError {
    match error {
        AccountPersistenceError::Connection { message } => HostPersistenceError::connection(message),
        other => HostPersistenceError::query(other.to_string()),
    }
}

#[async_trait]
impl HostRepository for DieselHostRepository {
    async fn owner_exists(&self, owner: &RecordId) -> Result<bool, HostPersistenceError> {
        self.accounts
            .exists_by_id(owner)
            .await
            .map_err(map_account_error)
    }

    async fn exists(
        &self,
        owner: &RecordId,
        hostname: &Hostname,
    ) -> Result<bool, HostPersistenceError> {
        let Some(owner_id) = owner.as_i64() else {
            return Ok(false);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = hosts::table
            .filter(hosts::owner_id.eq(owner_id))
            .filter(hosts::hostname.eq(hostname.as_ref()))
            .select(hosts::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn insert(
        &self,
        host: &NewHost,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, HostPersistenceError> {
        let owner_id = host.owner.as_i64().ok_or_else(|| {
            HostPersistenceError::missing_owner(format!("{} is not an account row id", host.owner))
        })?;
        let row = NewHostRow {
            owner_id,
            hostname: host.hostname.as_ref(),
            operating_system_name: host.operating_system.as_ref().map(|os| os.name()),
            created_at,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(hosts::table)
            .values(&row)
            .returning(hosts::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(RecordId::from(id))
    }
}
