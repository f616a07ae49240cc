//! Account registration service.
//!
//! Implements [`AccountRegistration`] on top of any [`AccountRepository`]:
//! validate, reject duplicates, derive the credential, issue a token, stamp
//! the creation time, persist. Nothing is written unless every earlier step
//! succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::ports::{
    AccountPersistenceError, AccountRegistration, AccountRepository, RegisterAccount,
};
use crate::domain::{
    Account, AccountValidationError, CredentialHasher, Error, NewAccount, TokenIssuer,
};

/// Registration service for new accounts.
#[derive(Clone)]
pub struct AccountRegistrationService<A> {
    accounts: Arc<A>,
    hasher: CredentialHasher,
    issuer: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl<A> AccountRegistrationService<A> {
    pub fn new(accounts: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hasher: CredentialHasher::new(),
            issuer: TokenIssuer,
            clock,
        }
    }

    /// Replace the credential hasher, e.g. to tune Argon2id work factors.
    #[must_use]
    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }
}

pub(crate) fn map_validation_error(error: &AccountValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.reason(),
    }))
}

pub(crate) fn map_account_persistence_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Duplicate { message } => {
            debug!(%message, "account insert lost a uniqueness race");
            Error::conflict("account already exists")
        }
        other => {
            error!(error = %other, "account store failed");
            Error::internal(other.to_string())
        }
    }
}

impl<A> AccountRegistrationService<A>
where
    A: AccountRepository,
{
    async fn derive_credential(&self, candidate: NewAccount) -> Result<NewAccount, Error> {
        let hasher = self.hasher;
        let outcome = tokio::task::spawn_blocking(move || {
            let mut candidate = candidate;
            hasher.derive(&mut candidate).map(|()| candidate)
        })
        .await
        .map_err(|err| {
            error!(error = %err, "credential derivation task aborted");
            Error::internal("credential derivation failed")
        })?;

        outcome.map_err(|err| {
            error!(error = %err, "credential derivation failed");
            Error::internal("credential derivation failed")
        })
    }
}

#[async_trait]
impl<A> AccountRegistration for AccountRegistrationService<A>
where
    A: AccountRepository + 'static,
{
    async fn register(&self, request: RegisterAccount) -> Result<Account, Error> {
        let RegisterAccount {
            username,
            email,
            password,
        } = request;
        let candidate = NewAccount::try_from_parts(&username, &email, password).map_err(|err| {
            debug!(field = err.field(), reason = err.reason(), "account rejected");
            map_validation_error(&err)
        })?;

        let taken = self
            .accounts
            .exists(candidate.username(), candidate.email())
            .await
            .map_err(map_account_persistence_error)?;
        if taken {
            debug!(username = %candidate.username(), "username or email already registered");
            return Err(Error::conflict("account already exists"));
        }

        let mut candidate = self.derive_credential(candidate).await?;
        self.issuer.issue(&mut candidate);
        let token = candidate
            .token()
            .cloned()
            .ok_or_else(|| Error::internal("bearer token was not issued"))?;

        let created_at = self.clock.utc();
        let id = self
            .accounts
            .insert(&candidate, created_at)
            .await
            .map_err(map_account_persistence_error)?;

        info!(account_id = %id, username = %candidate.username(), "account registered");
        Ok(Account::new(
            id,
            candidate.username().clone(),
            candidate.email().clone(),
            token,
            created_at,
        ))
    }
}
