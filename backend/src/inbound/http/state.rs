//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving
//! ports, so they can be exercised without any store.

use std::sync::Arc;

use crate::domain::ports::{AccountRegistration, HostRegistration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountRegistration>,
    pub hosts: Arc<dyn HostRegistration>,
}

impl HttpState {
    pub fn new(accounts: Arc<dyn AccountRegistration>, hosts: Arc<dyn HostRegistration>) -> Self {
        Self { accounts, hosts }
    }
}
