//! Driven port for account persistence.
//!
//! Every store backend implements [`AccountRepository`]. Adapters must keep
//! username, email, and token unique and report a write that would break
//! that rule as [`AccountPersistenceError::Duplicate`], so that a race lost
//! after the existence check still surfaces as a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BearerToken, EmailAddress, NewAccount, RecordId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "account store connection failed: {message}",
        /// A lookup or write failed while executing.
        Query { message: String } => "account store query failed: {message}",
        /// The write collided with an existing username, email, or token.
        Duplicate { message: String } => "account already exists: {message}",
        /// The candidate reached the store before its credential or token was set.
        Incomplete { message: String } => "account candidate incomplete: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Whether any account uses this username or this email.
    async fn exists(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<bool, AccountPersistenceError>;

    /// Whether an account with this id exists.
    ///
    /// Ids minted by a different backend never match.
    async fn exists_by_id(&self, id: &RecordId) -> Result<bool, AccountPersistenceError>;

    /// Id of the account holding `token`, if any.
    async fn find_by_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<RecordId>, AccountPersistenceError>;

    /// Persist a candidate whose credential is derived and token issued.
    ///
    /// Returns the id assigned by the store.
    async fn insert(
        &self,
        account: &NewAccount,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, AccountPersistenceError>;
}
