//! Account registration handler.
//!
//! ```text
//! POST /user/create {"username":"alice","email":"alice@example.com","password":"s3cret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use super::body::{MAX_BODY_BYTES, decode_json, read_capped};
use super::{ApiResponse, ApiResult, HttpState};
use crate::domain::Password;
use crate::domain::ports::RegisterAccount;

/// Request body for `POST /user/create`.
#[derive(Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
}

impl From<CreateAccountRequest> for RegisterAccount {
    fn from(value: CreateAccountRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: Password::new(value.password),
        }
    }
}

/// Register a new account and return it with its bearer token.
#[utoipa::path(
    post,
    path = "/user/create",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = crate::inbound::http::schemas::AccountCreatedSchema),
        (status = 400, description = "Validation failed", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 409, description = "Username or email already registered", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 422, description = "Body is not a valid document", body = crate::inbound::http::schemas::ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorEnvelopeSchema)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/user/create")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let body = read_capped(payload, MAX_BODY_BYTES).await?;
    let request: CreateAccountRequest = decode_json(&body)?;
    debug!(username = %request.username, "account registration requested");

    let account = state.accounts.register(request.into()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("User created successfully!", account)))
}
