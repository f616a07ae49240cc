//! Host registration service.
//!
//! The owner is named either by a bearer token or by an explicit account id.
//! A token takes precedence when both are supplied. An unusable token is the
//! caller's mistake and yields `invalid_request`; an id that names no
//! account yields `not_found`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::account_registration::map_account_persistence_error;
use crate::domain::ports::{
    AccountRepository, HostPersistenceError, HostRegistration, HostRepository, OwnerReference,
    RegisterHost,
};
use crate::domain::{
    BearerToken, Error, Host, HostValidationError, Hostname, NewHost, OperatingSystem, RecordId,
};

/// Registration service for hosts.
#[derive(Clone)]
pub struct HostRegistrationService<A, H> {
    accounts: Arc<A>,
    hosts: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<A, H> HostRegistrationService<A, H> {
    pub fn new(accounts: Arc<A>, hosts: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hosts,
            clock,
        }
    }
}

fn map_host_persistence_error(error: HostPersistenceError) -> Error {
    match error {
        HostPersistenceError::Duplicate { message } => {
            debug!(%message, "host insert lost a uniqueness race");
            Error::conflict("host already registered for this account")
        }
        HostPersistenceError::MissingOwner { message } => {
            debug!(%message, "host owner vanished before insert");
            Error::not_found("account not found")
        }
        other => {
            error!(error = %other, "host store failed");
            Error::internal(other.to_string())
        }
    }
}

fn map_hostname_error(error: HostValidationError) -> Error {
    let reason = match error {
        HostValidationError::EmptyHostname => "empty_hostname",
        HostValidationError::HostnameTooLong => "hostname_length",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "hostname",
        "code": reason,
    }))
}

fn invalid_token() -> Error {
    Error::invalid_request("invalid token").with_details(json!({
        "field": "token",
        "code": "invalid_token",
    }))
}

impl<A, H> HostRegistrationService<A, H>
where
    A: AccountRepository,
    H: HostRepository,
{
    async fn resolve_owner(&self, owner: Option<OwnerReference>) -> Result<RecordId, Error> {
        let owner_id = match owner {
            None => {
                return Err(
                    Error::invalid_request("owner required: supply a token or user.id")
                        .with_details(json!({ "field": "user.id", "code": "missing_owner" })),
                );
            }
            Some(OwnerReference::Token(raw)) => {
                let token = BearerToken::parse(&raw).map_err(|err| {
                    debug!(error = %err, "malformed bearer token");
                    invalid_token()
                })?;
                self.accounts
                    .find_by_token(&token)
                    .await
                    .map_err(map_account_persistence_error)?
                    .ok_or_else(|| {
                        debug!("bearer token matches no account");
                        invalid_token()
                    })?
            }
            Some(OwnerReference::Id(id)) => id,
        };

        let exists = self
            .hosts
            .owner_exists(&owner_id)
            .await
            .map_err(map_host_persistence_error)?;
        if exists {
            Ok(owner_id)
        } else {
            debug!(owner_id = %owner_id, "host owner not found");
            Err(Error::not_found("account not found")
                .with_details(json!({ "field": "user.id", "id": owner_id })))
        }
    }
}

#[async_trait]
impl<A, H> HostRegistration for HostRegistrationService<A, H>
where
    A: AccountRepository,
    H: HostRepository,
{
    async fn register(&self, request: RegisterHost) -> Result<Host, Error> {
        let RegisterHost {
            owner,
            hostname,
            operating_system,
        } = request;
        let hostname = Hostname::new(&hostname).map_err(map_hostname_error)?;
        let operating_system = operating_system
            .as_deref()
            .and_then(OperatingSystem::from_reported);

        let owner = self.resolve_owner(owner).await?;

        let taken = self
            .hosts
            .exists(&owner, &hostname)
            .await
            .map_err(map_host_persistence_error)?;
        if taken {
            debug!(owner_id = %owner, hostname = %hostname, "host already registered");
            return Err(Error::conflict("host already registered for this account"));
        }

        let candidate = NewHost {
            owner,
            hostname,
            operating_system,
        };
        let created_at = self.clock.utc();
        let id = self
            .hosts
            .insert(&candidate, created_at)
            .await
            .map_err(map_host_persistence_error)?;

        info!(host_id = %id, owner_id = %candidate.owner, hostname = %candidate.hostname, "host registered");
        Ok(Host::new(id, candidate, created_at))
    }
}
