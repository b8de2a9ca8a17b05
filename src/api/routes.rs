//! Router assembly: public and protected route groups, OpenAPI document,
//! Swagger UI and the middleware stack.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDocument;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Routes plus the generated OpenAPI document, before the stack is applied.
pub fn api_router(state: AppState) -> (Router<AppState>, OpenApiDocument) {
    let protected = OpenApiRouter::new()
        .nest("/me", handlers::me::me_routes())
        .nest("/accounts", handlers::accounts::account_routes())
        .nest("/clients", handlers::clients::client_routes())
        .nest("/branches", handlers::branches::branch_routes())
        .nest("/companies", handlers::companies::company_routes())
        .nest("/balance", handlers::balance::balance_routes())
        .nest("/balances", handlers::balance::balances_routes())
        .nest("/notifications", handlers::notifications::notification_routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    let api = OpenApiRouter::new()
        .nest("/auth", handlers::auth::auth_routes())
        .merge(protected);

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/api", api)
        .split_for_parts()
}

/// Builds the application router.
///
/// Layers run outermost first: CORS, request ID, access log, compression,
/// then error shaping closest to the handlers so it sees uncompressed bodies.
///
/// ```ignore
/// let state = AppState::new(pool, &settings);
/// axum::serve(listener, create_router(state)).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = api_router(state.clone());

    router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi))
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
