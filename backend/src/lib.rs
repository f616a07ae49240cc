//! Account and host registration backend.
//!
//! Layout follows a hexagonal split:
//! - [`domain`]: models, registration services, and ports.
//! - [`inbound`]: the Actix HTTP adapter.
//! - [`outbound`]: store backends (in-process, PostgreSQL, MongoDB).
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
