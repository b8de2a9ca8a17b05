//! HTTP API layer: handlers, middleware, DTOs and router assembly.

mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use doc::ApiDoc;
pub use routes::create_router;
