//! Bounded request body intake.
//!
//! Registration bodies are read up to [`MAX_BODY_BYTES`] and silently cut
//! there. An oversized document therefore fails to decode and is answered
//! like any other malformed body.

use actix_web::web::{self, BytesMut};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::domain::Error;

/// Upper bound on the bytes read from a registration body.
pub const MAX_BODY_BYTES: usize = 100_000;

/// Read at most `limit` bytes from `payload`.
///
/// A transport failure while reading aborts only the current request.
pub async fn read_capped(mut payload: web::Payload, limit: usize) -> Result<BytesMut, Error> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            error!(error = %err, "failed to read request body");
            Error::internal("failed to read request body")
        })?;
        let remaining = limit.saturating_sub(body.len());
        if chunk.len() >= remaining {
            body.extend_from_slice(chunk.get(..remaining).unwrap_or_default());
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Decode a JSON document, answering any failure with `unprocessable_entity`.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|err| {
        debug!(error = %err, "request body is not a valid document");
        Error::unprocessable_entity("Unprocessable entity")
    })
}
