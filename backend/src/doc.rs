//! OpenAPI documentation for the registration API.
//!
//! Registers the two registration endpoints, the health probes, and the
//! schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI serves
//! this document in debug builds and `openapi-dump` prints it for tooling.

use utoipa::OpenApi;

use crate::inbound::http::accounts::CreateAccountRequest;
use crate::inbound::http::hosts::{CreateHostRequest, OperatingSystemPayload, OwnerPayload};
use crate::inbound::http::schemas::{
    AccountCreatedSchema, AccountSchema, ErrorCodeSchema, ErrorEnvelopeSchema, HostCreatedSchema,
    HostSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "hostwatch registration API",
        description = "Account and host registration for the monitoring backend."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::hosts::create_host,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateAccountRequest,
        CreateHostRequest,
        OwnerPayload,
        OperatingSystemPayload,
        AccountSchema,
        HostSchema,
        AccountCreatedSchema,
        HostCreatedSchema,
        ErrorEnvelopeSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "accounts", description = "Account registration"),
        (name = "hosts", description = "Host registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/user/create")]
    #[case("/server/create")]
    fn registration_paths_are_documented_as_post(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get(path).expect("path documented");
        assert!(item.post.is_some(), "{path} documents POST");
        assert!(item.get.is_none());
    }

    #[rstest]
    fn host_registration_documents_the_token_parameter() {
        let doc = ApiDoc::openapi();
        let operation = doc
            .paths
            .paths
            .get("/server/create")
            .and_then(|item| item.post.as_ref())
            .expect("create host operation");
        let parameters = operation.parameters.as_ref().expect("parameters");
        assert!(parameters.iter().any(|p| p.name == "token"));
    }

    #[rstest]
    fn error_envelope_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("ErrorEnvelopeSchema"));
    }
}
