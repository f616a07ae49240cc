//! Store selection and construction of the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::info;

use hostwatch::domain::ports::{AccountRepository, HostRepository};
use hostwatch::domain::{AccountRegistrationService, HostRegistrationService};
use hostwatch::inbound::http::HttpState;
#[cfg(feature = "mongo")]
use hostwatch::outbound::document::DocumentStore;
use hostwatch::outbound::memory::{InMemoryAccountRepository, InMemoryHostRepository};
use hostwatch::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselHostRepository, PoolConfig, apply_migrations,
};

use super::config::StoreSettings;

/// The store chosen for this process, connected and ready.
pub enum StoreBackend {
    Memory,
    Postgres(DbPool),
    #[cfg(feature = "mongo")]
    Mongo(DocumentStore),
}

impl StoreBackend {
    /// Connect the configured store. Relational migrations run first.
    pub async fn connect(settings: StoreSettings) -> std::io::Result<Self> {
        match settings {
            StoreSettings::Memory => {
                info!(store = "memory", "using in-process store");
                Ok(Self::Memory)
            }
            StoreSettings::Postgres {
                database_url,
                pool_max_size,
            } => {
                apply_migrations(&database_url)
                    .await
                    .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
                let mut config = PoolConfig::new(database_url);
                if let Some(max_size) = pool_max_size {
                    config = config.with_max_size(max_size);
                }
                let pool = DbPool::new(config)
                    .await
                    .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
                info!(store = "postgres", "connected to relational store");
                Ok(Self::Postgres(pool))
            }
            #[cfg(feature = "mongo")]
            StoreSettings::Mongo { uri, database } => {
                let store = DocumentStore::connect(&uri, &database)
                    .await
                    .map_err(|err| std::io::Error::other(err.to_string()))?;
                Ok(Self::Mongo(store))
            }
            #[cfg(not(feature = "mongo"))]
            StoreSettings::Mongo { .. } => Err(std::io::Error::other(
                "store mongo is not compiled in; rebuild with --features mongo",
            )),
        }
    }
}

fn registration_state<A, H>(accounts: A, hosts: H, clock: Arc<dyn Clock>) -> HttpState
where
    A: AccountRepository + 'static,
    H: HostRepository + 'static,
{
    let accounts = Arc::new(accounts);
    HttpState::new(
        Arc::new(AccountRegistrationService::new(
            Arc::clone(&accounts),
            Arc::clone(&clock),
        )),
        Arc::new(HostRegistrationService::new(accounts, Arc::new(hosts), clock)),
    )
}

/// Wire both registration services to the selected store.
pub(super) fn build_http_state(
    store: &StoreBackend,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let state = match store {
        StoreBackend::Memory => {
            let accounts = InMemoryAccountRepository::new();
            let hosts = InMemoryHostRepository::new(accounts.clone());
            registration_state(accounts, hosts, clock)
        }
        StoreBackend::Postgres(pool) => registration_state(
            DieselAccountRepository::new(pool.clone()),
            DieselHostRepository::new(pool.clone()),
            clock,
        ),
        #[cfg(feature = "mongo")]
        StoreBackend::Mongo(store) => registration_state(store.accounts(), store.hosts(), clock),
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwatch::domain::ports::{
        AccountRegistration, HostRegistration, OwnerReference, RegisterAccount, RegisterHost,
    };
    use hostwatch::domain::{ErrorCode, Password};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn memory_state() -> web::Data<HttpState> {
        build_http_state(&StoreBackend::Memory, Arc::new(DefaultClock))
    }

    #[rstest]
    #[tokio::test]
    async fn memory_store_registers_accounts_and_their_hosts() {
        let state = memory_state();
        let account = state
            .accounts
            .register(RegisterAccount {
                username: "alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password: Password::new("correct horse"),
            })
            .await
            .expect("account registered");

        let host = state
            .hosts
            .register(RegisterHost {
                owner: Some(OwnerReference::Token(account.token().as_ref().to_owned())),
                hostname: "web-01".to_owned(),
                operating_system: Some("Linux".to_owned()),
            })
            .await
            .expect("host registered");
        assert_eq!(host.owner(), account.id());
    }

    #[rstest]
    #[tokio::test]
    async fn each_state_gets_its_own_memory_store() {
        let request = || RegisterAccount {
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            password: Password::new("correct horse"),
        };
        let first = memory_state();
        let second = memory_state();

        first.accounts.register(request()).await.expect("first store");
        second.accounts.register(request()).await.expect("second store");
        let err = first
            .accounts
            .register(request())
            .await
            .expect_err("duplicate in the same store");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
