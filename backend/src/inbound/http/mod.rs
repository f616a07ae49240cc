//! HTTP inbound adapter exposing the registration endpoints.
//!
//! ```text
//! POST /user/create    {"username":"alice","email":"alice@example.com","password":"..."}
//! POST /server/create  {"hostname":"web-01","user":{"id":1},"os":{"name":"Linux"}}
//! POST /server/create?token=<64 chars>  {"hostname":"web-01"}
//! ```

pub mod accounts;
pub mod body;
pub mod envelope;
pub mod error;
pub mod health;
pub mod hosts;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;

pub use envelope::ApiResponse;
pub use error::ApiResult;
pub use state::HttpState;
