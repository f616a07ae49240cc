//! Driving port behind `POST /server/create`.

use async_trait::async_trait;

use crate::domain::{Error, Host, RecordId};

/// How a host registration names its owning account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerReference {
    /// Bearer token text as received; validated by the implementation.
    Token(String),
    /// Explicit account id.
    Id(RecordId),
}

/// Raw host registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterHost {
    /// `None` when the caller supplied neither a token nor an id.
    pub owner: Option<OwnerReference>,
    pub hostname: String,
    pub operating_system: Option<String>,
}

/// Registers hosts under existing accounts.
///
/// Implementations resolve and confirm the owner, reject a hostname the
/// owner already registered with a conflict, and persist the host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostRegistration: Send + Sync {
    async fn register(&self, request: RegisterHost) -> Result<Host, Error>;
}
