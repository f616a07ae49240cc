//! Bearer tokens that let a host agent act on behalf of an account.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;

use super::NewAccount;

/// Number of characters in an issued token.
pub const TOKEN_LENGTH: usize = 64;

/// Rejection reasons for token text supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenValidationError {
    #[error("token must be exactly {TOKEN_LENGTH} characters")]
    Length,
    #[error("token must contain only ASCII letters and digits")]
    Alphabet,
}

/// Opaque 64-character alphanumeric credential.
///
/// # Examples
/// ```
/// use hostwatch::domain::BearerToken;
///
/// let raw = "a".repeat(64);
/// let token = BearerToken::parse(&raw).expect("valid token");
/// assert_eq!(token.as_ref(), raw);
/// assert!(BearerToken::parse("short").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct BearerToken(String);

impl BearerToken {
    /// Validate token text received from a client or loaded from a store.
    pub fn parse(raw: &str) -> Result<Self, TokenValidationError> {
        if raw.len() != TOKEN_LENGTH {
            return Err(TokenValidationError::Length);
        }
        if !raw.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
            return Err(TokenValidationError::Alphabet);
        }
        Ok(Self(raw.to_owned()))
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let raw = rng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(raw)
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl From<BearerToken> for String {
    fn from(value: BearerToken) -> Self {
        value.0
    }
}

/// Assigns a bearer token to a pending account exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    /// Issue a token from the thread-local CSPRNG.
    pub fn issue(&self, account: &mut NewAccount) {
        self.issue_with(account, &mut rand::thread_rng());
    }

    /// Issue a token drawn from `rng`. An existing token is left in place.
    pub fn issue_with<R: Rng + ?Sized>(&self, account: &mut NewAccount, rng: &mut R) {
        if account.token().is_some() {
            return;
        }
        account.set_token(BearerToken::generate(rng));
    }
}
