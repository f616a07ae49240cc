//! MongoDB-backed [`AccountRepository`] and [`HostRepository`].

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime, doc};
use chrono::Utc;
use mongodb::Collection;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, HostPersistenceError, HostRepository,
};
use crate::domain::{BearerToken, EmailAddress, Hostname, NewAccount, NewHost, RecordId, Username};

use super::documents::{AccountDocument, HostDocument, binary};

const DUPLICATE_KEY: i32 = 11_000;

/// How a driver error should surface through the ports.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MongoFailure {
    Connection(String),
    DuplicateKey(String),
    Query(String),
}

fn classify(error: &MongoError) -> MongoFailure {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            MongoFailure::DuplicateKey(write.message.clone())
        }
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => MongoFailure::Connection(error.to_string()),
        _ => MongoFailure::Query(error.to_string()),
    }
}

fn account_error(error: &MongoError) -> AccountPersistenceError {
    match classify(error) {
        MongoFailure::Connection(message) => AccountPersistenceError::connection(message),
        MongoFailure::DuplicateKey(message) => AccountPersistenceError::duplicate(message),
        MongoFailure::Query(message) => AccountPersistenceError::query(message),
    }
}

fn host_error(error: &MongoError) -> HostPersistenceError {
    match classify(error) {
        MongoFailure::Connection(message) => HostPersistenceError::connection(message),
        MongoFailure::DuplicateKey(message) => HostPersistenceError::duplicate(message),
        MongoFailure::Query(message) => HostPersistenceError::query(message),
    }
}

/// Ids minted by another backend are not object ids and match nothing here.
fn object_id(id: &RecordId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_ref()).ok()
}

fn inserted_id(inserted: &Bson) -> Option<RecordId> {
    inserted
        .as_object_id()
        .and_then(|oid| RecordId::new(oid.to_hex()).ok())
}

/// Accounts stored in the `accounts` collection.
#[derive(Debug, Clone)]
pub struct MongoAccountRepository {
    collection: Collection<AccountDocument>,
}

impl MongoAccountRepository {
    pub(super) fn new(collection: Collection<AccountDocument>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    async fn exists(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<bool, AccountPersistenceError> {
        let filter = doc! {
            "$or": [
                { "username": username.as_ref() },
                { "email": email.as_ref() },
            ]
        };
        let found = self
            .collection
            .find_one(filter)
            .await
            .map_err(|err| account_error(&err))?;
        Ok(found.is_some())
    }

    async fn exists_by_id(&self, id: &RecordId) -> Result<bool, AccountPersistenceError> {
        let Some(oid) = object_id(id) else {
            return Ok(false);
        };
        let found = self
            .collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|err| account_error(&err))?;
        Ok(found.is_some())
    }

    async fn find_by_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<RecordId>, AccountPersistenceError> {
        let found = self
            .collection
            .find_one(doc! { "token": token.as_ref() })
            .await
            .map_err(|err| account_error(&err))?;
        Ok(found
            .and_then(|document| document.id)
            .and_then(|oid| RecordId::new(oid.to_hex()).ok()))
    }

    async fn insert(
        &self,
        account: &NewAccount,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<RecordId, AccountPersistenceError> {
        let credential = account
            .derived_credential()
            .ok_or_else(|| AccountPersistenceError::incomplete("credential not derived"))?;
        let token = account
            .token()
            .ok_or_else(|| AccountPersistenceError::incomplete("token not issued"))?;
        let document = AccountDocument {
            id: None,
            username: account.username().as_ref().to_owned(),
            email: account.email().as_ref().to_owned(),
            password_hash: binary(credential.key()),
            salt: binary(credential.salt()),
            token: token.as_ref().to_owned(),
            created_at: DateTime::from_chrono(created_at),
        };

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|err| account_error(&err))?;
        inserted_id(&result.inserted_id)
            .ok_or_else(|| AccountPersistenceError::query("insert returned no object id"))
    }
}

/// Hosts stored in the `hosts` collection.
///
/// The document store has no foreign keys, so the owner is re-checked right
/// before each write.
#[derive(Debug, Clone)]
pub struct MongoHostRepository {
    accounts: MongoAccountRepository,
    collection: Collection<HostDocument>,
}

impl MongoHostRepository {
    pub(super) fn new(
        accounts: MongoAccountRepository,
        collection: Collection<HostDocument>,
    ) -> Self {
        Self {
            accounts,
            collection,
        }
    }
}

fn owner_lookup_error(error: AccountPersistenceError) -> HostPersistenceError {
    match error {
        AccountPersistenceError::Connection { message } => {
            HostPersistenceError::connection(message)
        }
        other => HostPersistenceError::query(other.to_string()),
    }
}

#[async_trait]
impl HostRepository for MongoHostRepository {
    async fn owner_exists(&self, owner: &RecordId) -> Result<bool, HostPersistenceError> {
        self.accounts
            .exists_by_id(owner)
            .await
            .map_err(owner_lookup_error)
    }

    async fn exists(
        &self,
        owner: &RecordId,
        hostname: &Hostname,
    ) -> Result<bool, HostPersistenceError> {
        let Some(owner_id) = object_id(owner) else {
            return Ok(false);
        };
        let found = self
            .collection
            .find_one(doc! { "owner_id": owner_id, "hostname": hostname.as_ref() })
            .await
            .map_err(|err| host_error(&err))?;
        Ok(found.is_some())
    }

    async fn insert(
        &self,
        host: &NewHost,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<RecordId, HostPersistenceError> {
        let missing = || HostPersistenceError::missing_owner(host.owner.to_string());
        let owner_id = object_id(&host.owner).ok_or_else(missing)?;
        if !self.owner_exists(&host.owner).await? {
            return Err(missing());
        }

        let document = HostDocument {
            id: None,
            owner_id,
            hostname: host.hostname.as_ref().to_owned(),
            operating_system_name: host
                .operating_system
                .as_ref()
                .map(|os| os.name().to_owned()),
            created_at: DateTime::from_chrono(created_at),
        };
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|err| host_error(&err))?;
        inserted_id(&result.inserted_id)
            .ok_or_else(|| HostPersistenceError::query("insert returned no object id"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1")]
    #[case("not-an-object-id")]
    fn foreign_ids_are_not_object_ids(#[case] raw: &str) {
        let id = RecordId::new(raw).expect("record id");
        assert!(object_id(&id).is_none());
    }

    #[rstest]
    fn object_ids_round_trip_through_record_ids() {
        let oid = ObjectId::new();
        let id = inserted_id(&Bson::ObjectId(oid)).expect("object id");
        assert_eq!(id.as_ref(), oid.to_hex());
        assert_eq!(object_id(&id), Some(oid));
    }

    #[rstest]
    fn non_object_inserted_ids_are_rejected() {
        assert!(inserted_id(&Bson::Int64(4)).is_none());
    }
}
