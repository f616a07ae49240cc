//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`. The wrappers below mirror their
//! wire shape so the generated document stays accurate without coupling the
//! domain to utoipa.

#![expect(
    dead_code,
    reason = "fields exist only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unprocessable_entity")]
    UnprocessableEntity,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Failure envelope.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ErrorEnvelopeSchema {
    #[schema(example = "account already exists")]
    error: String,
    code: ErrorCodeSchema,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Account`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Account, rename_all = "camelCase")]
pub struct AccountSchema {
    #[schema(example = "1")]
    id: String,
    #[schema(example = "alice")]
    username: String,
    #[schema(example = "alice@example.com")]
    email: String,
    /// 64-character bearer token for host agents.
    token: String,
    #[schema(format = DateTime)]
    creation_date: String,
}

/// OpenAPI schema for [`crate::domain::Host`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Host, rename_all = "camelCase")]
pub struct HostSchema {
    #[schema(example = "5")]
    id: String,
    #[schema(example = "web-01")]
    hostname: String,
    /// Id of the owning account.
    #[schema(example = "1")]
    owner: String,
    #[schema(example = "Linux")]
    operating_system_name: Option<String>,
    #[schema(format = DateTime)]
    creation_date: String,
}

/// Success envelope of `POST /user/create`.
#[derive(ToSchema)]
pub struct AccountCreatedSchema {
    #[schema(example = "User created successfully!")]
    message: String,
    metadata: AccountSchema,
}

/// Success envelope of `POST /server/create`.
#[derive(ToSchema)]
pub struct HostCreatedSchema {
    #[schema(example = "Server created successfully!")]
    message: String,
    metadata: HostSchema,
}
