//! HTTP request handlers, one module per resource.
//!
//! Each module exposes a `*_routes()` function returning an
//! [`OpenApiRouter`](utoipa_axum::router::OpenApiRouter) that
//! `api::routes` nests under its prefix.

pub mod accounts;
pub mod auth;
pub mod balance;
pub mod branches;
pub mod clients;
pub mod companies;
pub mod health;
pub mod me;
pub mod notifications;
