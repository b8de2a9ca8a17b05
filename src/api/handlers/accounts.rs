//! Account management within the caller's tenant.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::ACCOUNT_TAG;
use crate::api::dto::{
    AccountListQuery, AccountResponse, CreateAccountRequest, ErrorResponse, ListResponse,
    MessageResponse, UpdateAccountRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn account_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_accounts, create_account))
        .routes(routes!(get_account, update_account, delete_account))
}

/// GET /api/accounts
#[utoipa::path(
    get,
    path = "/",
    tag = ACCOUNT_TAG,
    params(AccountListQuery),
    responses(
        (status = 200, description = "Accounts by page", body = ListResponse<AccountResponse>)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<AccountListQuery>,
) -> AppResult<Json<ListResponse<AccountResponse>>> {
    let page = state
        .services
        .accounts
        .list(auth_user.tenant_id, query.into())
        .await?;
    Ok(Json(ListResponse::from_page(page)))
}

/// POST /api/accounts
#[utoipa::path(
    post,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 403, description = "Platform role cannot be assigned", body = ErrorResponse),
        (status = 409, description = "Phone number already registered", body = ErrorResponse),
        (status = 422, description = "Invalid request data", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .services
        .accounts
        .create(auth_user.tenant_id, &auth_user.role, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /api/accounts/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 404, description = "No such account in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts.get(auth_user.tenant_id, id).await?;
    Ok(Json(account.into()))
}

/// PATCH /api/accounts/{id}
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 403, description = "Platform role cannot be assigned", body = ErrorResponse),
        (status = 404, description = "No such account in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .update(auth_user.tenant_id, &auth_user.role, id, req.into())
        .await?;
    Ok(Json(account.into()))
}

/// DELETE /api/accounts/{id}
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "No such account in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.accounts.delete(auth_user.tenant_id, id).await?;
    Ok(Json(MessageResponse::new("Account deleted")))
}
