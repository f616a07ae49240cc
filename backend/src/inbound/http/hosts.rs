//! Host registration handler.
//!
//! The owning account is named by a `token` query parameter or by `user.id`
//! in the body. The token wins when both are present.
//!
//! ```text
//! POST /server/create {"hostname":"web-01","user":{"id":1},"os":{"name":"Linux"}}
//! POST /server/create?token=<64 chars> {"hostname":"web-01","operatingSystemName":"Linux"}
//! ```

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use super::body::{MAX_BODY_BYTES, decode_json, read_capped};
use super::{ApiResponse, ApiResult, HttpState};
use crate::domain::{Error, RecordId};
use crate::domain::ports::{OwnerReference, RegisterHost};

/// Query string of `POST /server/create`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateHostQuery {
    /// Bearer token of the owning account.
    pub token: Option<String>,
}

/// Owner reference embedded in the body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnerPayload {
    /// Account id, as a string or an integer.
    #[schema(value_type = Option<String>, example = "1")]
    #[serde(default)]
    pub id: Option<RecordId>,
}

/// Operating system descriptor embedded in the body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OperatingSystemPayload {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
}

/// Request body for `POST /server/create`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHostRequest {
    #[schema(example = "web-01")]
    pub hostname: String,
    #[serde(default)]
    pub user: Option<OwnerPayload>,
    #[serde(default)]
    pub os: Option<OperatingSystemPayload>,
    /// Flat alternative to `os.name`; preferred when both are given.
    #[serde(default)]
    pub operating_system_name: Option<String>,
}

impl CreateHostRequest {
    fn into_command(self, token: Option<String>) -> RegisterHost {
        let Self {
            hostname,
            user,
            os,
            operating_system_name,
        } = self;
        let owner = token.map(OwnerReference::Token).or_else(|| {
            user.and_then(|payload| payload.id)
                .map(OwnerReference::Id)
        });
        let operating_system = operating_system_name.or_else(|| os.and_then(|os| os.name));
        RegisterHost {
            owner,
            hostname,
            operating_system,
        }
    }
}

fn parse_query(raw: &str) -> Result<CreateHostQuery, Error> {
    web::Query::<CreateHostQuery>::from_query(raw)
        .map(web::Query::into_inner)
        .map_err(|err| {
            debug!(error = %err, "unusable query string");
            Error::invalid_request("invalid query string")
                .with_details(json!({ "field": "token" }))
        })
}

/// Register a host under an existing account.
#[utoipa::path(
    post,
    path = "/server/create",
    params(CreateHostQuery),
    request_body = CreateHostRequest,
    responses(
        (status = 201, description = "Host registered", body = crate::inbound::http::schemas::HostCreatedSchema),
        (status = 400, description = "Invalid input, missing owner, or unusable token", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 404, description = "Owning account not found", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 409, description = "Hostname already registered for this account", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 422, description = "Body is not a valid document", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorEnvelopeSchema)
    ),
    tags = ["hosts"],
    operation_id = "createHost"
)]
#[post("/server/create")]
pub async fn create_host(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let CreateHostQuery { token } = parse_query(req.query_string())?;
    let body = read_capped(payload, MAX_BODY_BYTES).await?;
    let request: CreateHostRequest = decode_json(&body)?;
    debug!(
        hostname = %request.hostname,
        via_token = token.is_some(),
        "host registration requested"
    );

    let host = state.hosts.register(request.into_command(token)).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Server created successfully!", host)))
}
