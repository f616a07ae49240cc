//! Driving port behind `POST /user/create`.

use async_trait::async_trait;

use crate::domain::{Account, Error, Password};

/// Raw account registration input, validated by the implementation.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
    pub password: Password,
}

/// Registers new accounts.
///
/// Implementations validate the input, reject usernames or emails already in
/// use with a conflict, derive the credential, issue a bearer token, and
/// persist the result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistration: Send + Sync {
    async fn register(&self, request: RegisterAccount) -> Result<Account, Error>;
}
