//! Middleware for request IDs, access logging, error shaping and
//! authentication.

mod auth;
mod error_handler;
mod logging;
mod request_id;

pub use auth::{AuthUser, auth_middleware, bearer_token};
pub use error_handler::{error_to_code, error_to_status_code, global_error_handler};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
