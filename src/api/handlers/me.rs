//! The authenticated caller's own account.

use axum::{Extension, Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{AccountResponse, ErrorResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;

pub fn me_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_me))
}

/// GET /api/me
#[utoipa::path(
    get,
    path = "/",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account was deleted", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .get(auth_user.tenant_id, auth_user.account_id)
        .await?;
    Ok(Json(account.into()))
}
