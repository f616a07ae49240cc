//! Ports at the hexagonal boundary.
//!
//! Driving ports ([`AccountRegistration`], [`HostRegistration`]) are what the
//! HTTP adapter calls. Driven ports ([`AccountRepository`],
//! [`HostRepository`]) are what the registration services call and what each
//! store backend implements.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registration;
mod account_repository;
mod host_registration;
mod host_repository;

#[cfg(test)]
pub use account_registration::MockAccountRegistration;
pub use account_registration::{AccountRegistration, RegisterAccount};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use host_registration::MockHostRegistration;
pub use host_registration::{HostRegistration, OwnerReference, RegisterHost};
#[cfg(test)]
pub use host_repository::MockHostRepository;
pub use host_repository::{HostPersistenceError, HostRepository};
