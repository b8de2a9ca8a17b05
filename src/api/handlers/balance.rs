//! The caller's tenant balance, plus the platform-wide listing.

use axum::{Extension, Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::BALANCE_TAG;
use crate::api::dto::{
    BalanceListQuery, BalanceRequest, BalanceResponse, ErrorResponse, ListResponse,
    MessageResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Mounted at `/api/balance`.
pub fn balance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        get_balance,
        create_balance,
        update_balance,
        delete_balance
    ))
}

/// Mounted at `/api/balances`.
pub fn balances_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_balances))
}

/// GET /api/balance
#[utoipa::path(
    get,
    path = "/",
    tag = BALANCE_TAG,
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 404, description = "No balance for this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_balance(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<BalanceResponse>> {
    let balance = state.services.balances.get(auth_user.tenant_id).await?;
    Ok(Json(balance.into()))
}

/// POST /api/balance
#[utoipa::path(
    post,
    path = "/",
    tag = BALANCE_TAG,
    request_body = BalanceRequest,
    responses(
        (status = 201, description = "Balance opened", body = BalanceResponse),
        (status = 409, description = "Balance already exists", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_balance(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<BalanceRequest>,
) -> AppResult<(StatusCode, Json<BalanceResponse>)> {
    let balance = state
        .services
        .balances
        .create(auth_user.tenant_id, req.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(balance.into())))
}

/// PATCH /api/balance
#[utoipa::path(
    patch,
    path = "/",
    tag = BALANCE_TAG,
    request_body = BalanceRequest,
    responses(
        (status = 200, description = "Balance updated", body = BalanceResponse),
        (status = 404, description = "No balance for this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_balance(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<BalanceRequest>,
) -> AppResult<Json<BalanceResponse>> {
    let balance = state
        .services
        .balances
        .update(auth_user.tenant_id, req.amount)
        .await?;
    Ok(Json(balance.into()))
}

/// DELETE /api/balance
#[utoipa::path(
    delete,
    path = "/",
    tag = BALANCE_TAG,
    responses(
        (status = 200, description = "Balance deleted", body = MessageResponse),
        (status = 404, description = "Not found or already deleted", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_balance(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MessageResponse>> {
    state.services.balances.delete(auth_user.tenant_id).await?;
    Ok(Json(MessageResponse::new("Balance deleted")))
}

/// GET /api/balances
#[utoipa::path(
    get,
    path = "/",
    tag = BALANCE_TAG,
    params(BalanceListQuery),
    responses(
        (status = 200, description = "Balances by page", body = ListResponse<BalanceResponse>),
        (status = 403, description = "Platform role required", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_balances(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<BalanceListQuery>,
) -> AppResult<Json<ListResponse<BalanceResponse>>> {
    let page = state
        .services
        .balances
        .list(&auth_user.role, query.into())
        .await?;
    Ok(Json(ListResponse::from_page(page)))
}
