//! In-process account and host stores.
//!
//! Each repository keeps its rows behind a single mutex so the uniqueness
//! check and the write happen under one lock acquisition. Ids are sequential
//! integers starting at 1, matching what the relational backend issues.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, HostPersistenceError, HostRepository,
};
use crate::domain::{
    BearerToken, DerivedCredential, EmailAddress, Hostname, NewAccount, NewHost, RecordId,
    Username,
};

#[derive(Debug, Clone)]
struct AccountRow {
    username: String,
    email: String,
    #[expect(dead_code, reason = "credentials are written but never read back")]
    credential: DerivedCredential,
    token: String,
    #[expect(dead_code, reason = "creation time is written but never read back")]
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct AccountTable {
    last_id: i64,
    rows: HashMap<i64, AccountRow>,
}

impl AccountTable {
    fn collision(&self, username: &str, email: &str, token: &str) -> Option<&'static str> {
        self.rows.values().find_map(|row| {
            if row.username == username {
                Some("accounts_username_key")
            } else if row.email == email {
                Some("accounts_email_key")
            } else if row.token == token {
                Some("accounts_token_key")
            } else {
                None
            }
        })
    }
}

/// Account store held in process memory.
///
/// Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    table: Arc<Mutex<AccountTable>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |table| table.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, AccountTable>, AccountPersistenceError> {
        self.table
            .lock()
            .map_err(|_| AccountPersistenceError::connection("account table lock poisoned"))
    }

    fn contains(&self, id: &RecordId) -> Result<bool, AccountPersistenceError> {
        let Some(row_id) = id.as_i64() else {
            return Ok(false);
        };
        Ok(self.lock()?.rows.contains_key(&row_id))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn exists(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<bool, AccountPersistenceError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .values()
            .any(|row| row.username == username.as_ref() || row.email == email.as_ref()))
    }

    async fn exists_by_id(&self, id: &RecordId) -> Result<bool, AccountPersistenceError> {
        self.contains(id)
    }

    async fn find_by_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<RecordId>, AccountPersistenceError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .iter()
            .find(|(_, row)| row.token == token.as_ref())
            .map(|(id, _)| RecordId::from(*id)))
    }

    async fn insert(
        &self,
        account: &NewAccount,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, AccountPersistenceError> {
        let credential = account
            .derived_credential()
            .cloned()
            .ok_or_else(|| AccountPersistenceError::incomplete("credential not derived"))?;
        let token = account
            .token()
            .ok_or_else(|| AccountPersistenceError::incomplete("token not issued"))?;

        let mut table = self.lock()?;
        if let Some(constraint) =
            table.collision(account.username().as_ref(), account.email().as_ref(), token.as_ref())
        {
            return Err(AccountPersistenceError::duplicate(constraint));
        }

        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            AccountRow {
                username: account.username().as_ref().to_owned(),
                email: account.email().as_ref().to_owned(),
                credential,
                token: token.as_ref().to_owned(),
                created_at,
            },
        );
        Ok(RecordId::from(id))
    }
}

#[derive(Debug, Clone)]
struct HostRow {
    owner: i64,
    hostname: String,
    #[cfg_attr(not(test), expect(dead_code, reason = "read back only in tests"))]
    operating_system_name: Option<String>,
    #[cfg_attr(not(test), expect(dead_code, reason = "read back only in tests"))]
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct HostTable {
    last_id: i64,
    rows: HashMap<i64, HostRow>,
}

impl HostTable {
    fn contains(&self, owner: i64, hostname: &str) -> bool {
        self.rows
            .values()
            .any(|row| row.owner == owner && row.hostname == hostname)
    }
}

/// Host store held in process memory.
///
/// Owner checks read the account store passed to [`InMemoryHostRepository::new`].
#[derive(Debug, Clone)]
pub struct InMemoryHostRepository {
    accounts: InMemoryAccountRepository,
    table: Arc<Mutex<HostTable>>,
}

impl InMemoryHostRepository {
    pub fn new(accounts: InMemoryAccountRepository) -> Self {
        Self {
            accounts,
            table: Arc::new(Mutex::new(HostTable::default())),
        }
    }

    /// Number of stored hosts.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |table| table.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HostTable>, HostPersistenceError> {
        self.table
            .lock()
            .map_err(|_| HostPersistenceError::connection("host table lock poisoned"))
    }
}

fn map_account_error(error: AccountPersistenceError) -> HostPersistenceError {
    match error {
        AccountPersistenceError::Connection { message } => {
            HostPersistenceError::connection(message)
        }
        other => HostPersistenceError::query(other.to_string()),
    }
}

#[async_trait]
impl HostRepository for InMemoryHostRepository {
    async fn owner_exists(&self, owner: &RecordId) -> Result<bool, HostPersistenceError> {
        self.accounts.contains(owner).map_err(map_account_error)
    }

    async fn exists(
        &self,
        owner: &RecordId,
        hostname: &Hostname,
    ) -> Result<bool, HostPersistenceError> {
        let Some(owner_id) = owner.as_i64() else {
            return Ok(false);
        };
        Ok(self.lock()?.contains(owner_id, hostname.as_ref()))
    }

    async fn insert(
        &self,
        host: &NewHost,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, HostPersistenceError> {
        let missing = || HostPersistenceError::missing_owner(host.owner.to_string());
        let owner_id = host.owner.as_i64().ok_or_else(missing)?;
        if !self.accounts.contains(&host.owner).map_err(map_account_error)? {
            return Err(missing());
        }

        let mut table = self.lock()?;
        if table.contains(owner_id, host.hostname.as_ref()) {
            return Err(HostPersistenceError::duplicate("hosts_owner_hostname_key"));
        }

        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            HostRow {
                owner: owner_id,
                hostname: host.hostname.as_ref().to_owned(),
                operating_system_name: host
                    .operating_system
                    .as_ref()
                    .map(|os| os.name().to_owned()),
                created_at,
            },
        );
        Ok(RecordId::from(id))
    }
}
