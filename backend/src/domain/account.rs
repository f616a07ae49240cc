//! Account model: validated identity fields, the pending candidate built
//! during registration, and the public projection returned to callers.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use zeroize::Zeroizing;

use super::credentials::{Credential, DerivedCredential};
use super::{BearerToken, RecordId};

/// Shortest accepted username, in characters.
pub const USERNAME_MIN: usize = 3;
/// Usernames must be strictly shorter than this many characters.
pub const USERNAME_LIMIT: usize = 30;
/// Emails must be strictly longer than this many characters.
pub const EMAIL_FLOOR: usize = 8;
/// Longest accepted email, in characters.
pub const EMAIL_MAX: usize = 40;

/// Reasons a registration candidate is rejected before any store is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmailLength { length: usize },
    UsernameLength { length: usize },
    BlankUsername,
    InvalidEmail,
    EmptyPassword,
}

impl AccountValidationError {
    /// Name of the request field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmailLength { .. } | Self::InvalidEmail => "email",
            Self::UsernameLength { .. } | Self::BlankUsername => "username",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmailLength { .. } => "email_length",
            Self::UsernameLength { .. } => "username_length",
            Self::BlankUsername => "blank_username",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
        }
    }
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailLength { .. } => write!(
                f,
                "email must be longer than {EMAIL_FLOOR} and at most {EMAIL_MAX} characters"
            ),
            Self::UsernameLength { .. } => write!(
                f,
                "username must be at least {USERNAME_MIN} and fewer than {USERNAME_LIMIT} characters"
            ),
            Self::BlankUsername => write!(f, "username must not be blank"),
            Self::InvalidEmail => write!(f, "invalid email address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Username(String);

impl Username {
    fn check_length(raw: &str) -> Result<(), AccountValidationError> {
        let length = raw.chars().count();
        if !(USERNAME_MIN..USERNAME_LIMIT).contains(&length) {
            return Err(AccountValidationError::UsernameLength { length });
        }
        if raw.trim().is_empty() {
            return Err(AccountValidationError::BlankUsername);
        }
        Ok(())
    }

    /// Validate a username on its own.
    ///
    /// # Examples
    /// ```
    /// use hostwatch::domain::Username;
    ///
    /// assert!(Username::new("alice").is_ok());
    /// assert!(Username::new("al").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = raw.into();
        Self::check_length(&raw)?;
        Ok(Self(raw))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One mailbox: a local part, then a dotted domain of hostname labels.
        let pattern = r"^[^\s@]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique contact address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    fn check_length(raw: &str) -> Result<(), AccountValidationError> {
        let length = raw.chars().count();
        if length <= EMAIL_FLOOR || length > EMAIL_MAX {
            return Err(AccountValidationError::EmailLength { length });
        }
        Ok(())
    }

    fn check_syntax(raw: &str) -> Result<(), AccountValidationError> {
        if email_regex().is_match(raw) {
            Ok(())
        } else {
            Err(AccountValidationError::InvalidEmail)
        }
    }

    /// Validate an address on its own.
    ///
    /// # Examples
    /// ```
    /// use hostwatch::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("alice@example.com").is_ok());
    /// assert!(EmailAddress::new("not-an-address").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = raw.into();
        Self::check_length(&raw)?;
        Self::check_syntax(&raw)?;
        Ok(Self(raw))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Plaintext password supplied at registration. Wiped from memory on drop.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Account candidate travelling through registration.
///
/// ## Invariants
/// - Username and email were validated, email length first, then username
///   length, then email syntax.
/// - The credential is derived at most once and a token is issued at most
///   once; see [`crate::domain::CredentialHasher`] and
///   [`crate::domain::TokenIssuer`].
#[derive(Debug)]
pub struct NewAccount {
    username: Username,
    email: EmailAddress,
    credential: Credential,
    token: Option<BearerToken>,
}

impl NewAccount {
    /// Validate raw registration input.
    ///
    /// # Examples
    /// ```
    /// use hostwatch::domain::{NewAccount, Password};
    ///
    /// let candidate =
    ///     NewAccount::try_from_parts("alice", "alice@example.com", Password::new("s3cret"))
    ///         .expect("valid candidate");
    /// assert_eq!(candidate.username().as_ref(), "alice");
    /// assert!(!candidate.credential_derived());
    /// assert!(candidate.token().is_none());
    /// ```
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: Password,
    ) -> Result<Self, AccountValidationError> {
        EmailAddress::check_length(email)?;
        Username::check_length(username)?;
        EmailAddress::check_syntax(email)?;
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        Ok(Self {
            username: Username(username.to_owned()),
            email: EmailAddress(email.to_owned()),
            credential: Credential::Plain(password),
            token: None,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// The derived key and salt once the hasher has run.
    pub fn derived_credential(&self) -> Option<&DerivedCredential> {
        match &self.credential {
            Credential::Derived(derived) => Some(derived),
            Credential::Plain(_) => None,
        }
    }

    pub fn credential_derived(&self) -> bool {
        self.derived_credential().is_some()
    }

    pub(crate) fn credential(&self) -> &Credential {
        &self.credential
    }

    pub(crate) fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }

    pub(crate) fn set_token(&mut self, token: BearerToken) {
        self.token = Some(token);
    }
}

/// Persisted account as exposed to clients. Never carries key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: RecordId,
    username: Username,
    email: EmailAddress,
    token: BearerToken,
    creation_date: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: RecordId,
        username: Username,
        email: EmailAddress,
        token: BearerToken,
        creation_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            token,
            creation_date,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}
