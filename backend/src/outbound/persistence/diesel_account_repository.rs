//! PostgreSQL-backed [`AccountRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{BearerToken, EmailAddress, NewAccount, RecordId, Username};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::NewAccountRow;
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Account rows in the `accounts` table.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    AccountPersistenceError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AccountPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation(constraint) => AccountPersistenceError::duplicate(constraint),
        DieselFailure::Connection(message) => AccountPersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation(constraint) => AccountPersistenceError::query(constraint),
        DieselFailure::Query(message) => AccountPersistenceError::query(message),
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn exists(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = accounts::table
            .filter(
                accounts::username
                    .eq(username.as_ref())
                    .or(accounts::email.eq(email.as_ref())),
            )
            .select(accounts::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn exists_by_id(&self, id: &RecordId) -> Result<bool, AccountPersistenceError> {
        let Some(row_id) = id.as_i64() else {
            return Ok(false);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = accounts::table
            .find(row_id)
            .select(accounts::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn find_by_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<RecordId>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i64> = accounts::table
            .filter(accounts::token.eq(token.as_ref()))
            .select(accounts::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.map(RecordId::from))
    }

    async fn insert(
        &self,
        account: &NewAccount,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, AccountPersistenceError> {
        let credential = account
            .derived_credential()
            .ok_or_else(|| AccountPersistenceError::incomplete("credential not derived"))?;
        let token = account
            .token()
            .ok_or_else(|| AccountPersistenceError::incomplete("token not issued"))?;
        let row = NewAccountRow {
            username: account.username().as_ref(),
            email: account.email().as_ref(),
            password_hash: credential.key().as_slice(),
            salt: credential.salt().as_slice(),
            token: token.as_ref(),
            created_at,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(accounts::table)
            .values(&row)
            .returning(accounts::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(RecordId::from(id))
    }
}
