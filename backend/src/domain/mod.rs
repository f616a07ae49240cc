//! Domain primitives, registration services, and the ports they depend on.
//!
//! Purpose: hold the account and host registration rules independent of any
//! transport or storage engine. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the driven repository ports.
//!
//! Public surface:
//! - Error (alias to `DomainError`) and `ErrorCode` for transport-agnostic
//!   failures.
//! - `RecordId`, `Username`, `EmailAddress`, `Password`, `NewAccount`,
//!   `Account`: the account model and its validation.
//! - `CredentialHasher` and `TokenIssuer`: one-shot credential derivation and
//!   bearer token issuance for a pending account.
//! - `Hostname`, `OperatingSystem`, `NewHost`, `Host`: the host model.
//! - `AccountRegistrationService` and `HostRegistrationService`: the
//!   orchestration behind `POST /user/create` and `POST /server/create`.
//! - `TraceId` and `TRACE_ID_HEADER` for request correlation.

pub mod account;
pub mod account_registration;
pub mod credentials;
pub mod error;
pub mod host;
pub mod host_registration;
pub mod ports;
pub mod record_id;
#[cfg(test)]
pub(crate) mod test_support;
pub mod token;
pub mod trace_id;

pub use self::account::{
    Account, AccountValidationError, EmailAddress, NewAccount, Password, Username,
};
pub use self::account_registration::AccountRegistrationService;
pub use self::credentials::{Credential, CredentialError, CredentialHasher, DerivedCredential};
pub use self::error::{DomainError, ErrorCode};
pub use self::host::{Host, HostValidationError, Hostname, NewHost, OperatingSystem};
pub use self::host_registration::HostRegistrationService;
pub use self::record_id::{RecordId, RecordIdValidationError};
pub use self::token::{BearerToken, TOKEN_LENGTH, TokenIssuer, TokenValidationError};
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient alias for the domain error type.
pub type Error = DomainError;
