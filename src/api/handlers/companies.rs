//! Company (tenant) endpoints.
//!
//! Listing and standalone creation need the platform role. Single-company
//! routes accept the caller's own company, or any company for the platform
//! role.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::COMPANY_TAG;
use crate::api::dto::{
    AccountResponse, CompanyAccountsQuery, CompanyListQuery, CompanyResponse,
    CreateCompanyRequest, ErrorResponse, ListResponse, MessageResponse, UpdateCompanyRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::repositories::query::Page;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn company_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_companies, create_company))
        .routes(routes!(get_company, update_company, delete_company))
        .routes(routes!(list_company_accounts))
}

/// GET /api/companies
#[utoipa::path(
    get,
    path = "/",
    tag = COMPANY_TAG,
    params(CompanyListQuery),
    responses(
        (status = 200, description = "Live companies by page", body = ListResponse<CompanyResponse>),
        (status = 403, description = "Platform role required", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_companies(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<CompanyListQuery>,
) -> AppResult<Json<ListResponse<CompanyResponse>>> {
    let page = state
        .services
        .companies
        .list(&auth_user.role, query.into())
        .await?;
    Ok(Json(ListResponse::from_page(page)))
}

/// POST /api/companies
///
/// Creates a company without accounts. Tenants normally come from
/// `/api/auth/register`.
#[utoipa::path(
    post,
    path = "/",
    tag = COMPANY_TAG,
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 403, description = "Platform role required", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_company(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateCompanyRequest>,
) -> AppResult<(StatusCode, Json<CompanyResponse>)> {
    let company = state
        .services
        .companies
        .create(&auth_user.role, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(company.into())))
}

/// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = COMPANY_TAG,
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company found", body = CompanyResponse),
        (status = 403, description = "Another tenant's company", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_company(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CompanyResponse>> {
    let company = state
        .services
        .companies
        .get(auth_user.tenant_id, &auth_user.role, id)
        .await?;
    Ok(Json(company.into()))
}

/// PATCH /api/companies/{id}
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = COMPANY_TAG,
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 403, description = "Another tenant's company", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_company(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCompanyRequest>,
) -> AppResult<Json<CompanyResponse>> {
    let company = state
        .services
        .companies
        .update(auth_user.tenant_id, &auth_user.role, id, req.into())
        .await?;
    Ok(Json(company.into()))
}

/// DELETE /api/companies/{id}
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = COMPANY_TAG,
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company deleted", body = MessageResponse),
        (status = 403, description = "Another tenant's company", body = ErrorResponse),
        (status = 404, description = "Not found or already deleted", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_company(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .companies
        .delete(auth_user.tenant_id, &auth_user.role, id)
        .await?;
    Ok(Json(MessageResponse::new("Company deleted")))
}

/// GET /api/companies/{id}/accounts
#[utoipa::path(
    get,
    path = "/{id}/accounts",
    tag = COMPANY_TAG,
    params(
        ("id" = Uuid, Path, description = "Company ID"),
        CompanyAccountsQuery
    ),
    responses(
        (status = 200, description = "Accounts by page", body = ListResponse<AccountResponse>),
        (status = 403, description = "Another tenant's company", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_company_accounts(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<CompanyAccountsQuery>,
) -> AppResult<Json<ListResponse<AccountResponse>>> {
    let page = state
        .services
        .companies
        .list_accounts(
            auth_user.tenant_id,
            &auth_user.role,
            id,
            query.name.as_deref(),
            Page::new(query.page, query.limit),
        )
        .await?;
    Ok(Json(ListResponse::from_page(page)))
}
