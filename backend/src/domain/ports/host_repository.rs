//! Driven port for host persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Hostname, NewHost, RecordId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by host repository adapters.
    pub enum HostPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "host store connection failed: {message}",
        /// A lookup or write failed while executing.
        Query { message: String } => "host store query failed: {message}",
        /// The owner already has a host with this hostname.
        Duplicate { message: String } => "host already registered: {message}",
        /// The owning account disappeared before the host was written.
        MissingOwner { message: String } => "host owner missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostRepository: Send + Sync {
    /// Whether the account `owner` exists in the same store.
    async fn owner_exists(&self, owner: &RecordId) -> Result<bool, HostPersistenceError>;

    /// Whether `owner` already registered `hostname`.
    async fn exists(
        &self,
        owner: &RecordId,
        hostname: &Hostname,
    ) -> Result<bool, HostPersistenceError>;

    /// Persist a host and return the id assigned by the store.
    ///
    /// Adapters reject a second `(owner, hostname)` pair with
    /// [`HostPersistenceError::Duplicate`].
    async fn insert(
        &self,
        host: &NewHost,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, HostPersistenceError>;
}
