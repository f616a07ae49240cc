//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::Value;

use super::{HttpState, accounts, hosts};
use crate::Trace;
use crate::domain::ports::{MockAccountRegistration, MockHostRegistration};

/// App wired with the registration handlers over mocked driving ports.
pub(crate) fn registration_app(
    account_port: MockAccountRegistration,
    host_port: MockHostRegistration,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(account_port), Arc::new(host_port));
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(accounts::create_account)
        .service(hosts::create_host)
}

/// Decode a response body as JSON.
pub(crate) async fn json_body(res: ServiceResponse) -> Value {
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
