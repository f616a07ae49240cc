//! MongoDB store backend, compiled with the `mongo` feature.
//!
//! [`DocumentStore::connect`] pings the server and creates the unique indexes
//! before any repository is handed out, so duplicate writes are rejected by
//! the server with error code 11000.

mod documents;
mod repositories;

use bson::doc;
use mongodb::{Client, Database};
use tracing::info;

pub use repositories::{MongoAccountRepository, MongoHostRepository};

use documents::{ACCOUNTS, AccountDocument, HOSTS, HostDocument, account_indexes, host_indexes};

/// Errors raised while opening the document store.
#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("failed to connect to document store: {message}")]
    Connect { message: String },
    #[error("failed to create document store indexes: {message}")]
    Index { message: String },
}

/// Handle on the configured database.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    database: Database,
}

impl DocumentStore {
    /// Connect to `uri`, verify the server answers, and ensure indexes exist.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DocumentStoreError> {
        let connect_error = |err: mongodb::error::Error| DocumentStoreError::Connect {
            message: err.to_string(),
        };
        let client = Client::with_uri_str(uri).await.map_err(connect_error)?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connect_error)?;

        let index_error = |err: mongodb::error::Error| DocumentStoreError::Index {
            message: err.to_string(),
        };
        database
            .collection::<AccountDocument>(ACCOUNTS)
            .create_indexes(account_indexes())
            .await
            .map_err(index_error)?;
        database
            .collection::<HostDocument>(HOSTS)
            .create_indexes(host_indexes())
            .await
            .map_err(index_error)?;

        info!(database = database.name(), "document store ready");
        Ok(Self { database })
    }

    pub fn accounts(&self) -> MongoAccountRepository {
        MongoAccountRepository::new(self.database.collection(ACCOUNTS))
    }

    /// Host repository sharing this store's account collection for owner checks.
    pub fn hosts(&self) -> MongoHostRepository {
        MongoHostRepository::new(self.accounts(), self.database.collection(HOSTS))
    }
}
