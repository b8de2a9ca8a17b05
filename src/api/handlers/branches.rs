//! Branches of the caller's company.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::BRANCH_TAG;
use crate::api::dto::{
    BranchListQuery, BranchResponse, CreateBranchRequest, ErrorResponse, ListResponse,
    MessageResponse, UpdateBranchRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn branch_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_branches, create_branch))
        .routes(routes!(get_branch, update_branch, delete_branch))
}

/// GET /api/branches
#[utoipa::path(
    get,
    path = "/",
    tag = BRANCH_TAG,
    params(BranchListQuery),
    responses(
        (status = 200, description = "Live branches by page", body = ListResponse<BranchResponse>)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_branches(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<BranchListQuery>,
) -> AppResult<Json<ListResponse<BranchResponse>>> {
    let page = state
        .services
        .branches
        .list(auth_user.tenant_id, query.into())
        .await?;
    Ok(Json(ListResponse::from_page(page)))
}

/// POST /api/branches
#[utoipa::path(
    post,
    path = "/",
    tag = BRANCH_TAG,
    request_body = CreateBranchRequest,
    responses(
        (status = 201, description = "Branch created", body = BranchResponse),
        (status = 422, description = "Invalid request data", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_branch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateBranchRequest>,
) -> AppResult<(StatusCode, Json<BranchResponse>)> {
    let branch = state
        .services
        .branches
        .create(req.into_new(auth_user.tenant_id))
        .await?;
    Ok((StatusCode::CREATED, Json(branch.into())))
}

/// GET /api/branches/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = BRANCH_TAG,
    params(
        ("id" = Uuid, Path, description = "Branch ID")
    ),
    responses(
        (status = 200, description = "Branch found", body = BranchResponse),
        (status = 404, description = "No such live branch in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_branch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BranchResponse>> {
    let branch = state.services.branches.get(auth_user.tenant_id, id).await?;
    Ok(Json(branch.into()))
}

/// PATCH /api/branches/{id}
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = BRANCH_TAG,
    params(
        ("id" = Uuid, Path, description = "Branch ID")
    ),
    request_body = UpdateBranchRequest,
    responses(
        (status = 200, description = "Branch updated", body = BranchResponse),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 404, description = "No such live branch in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_branch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateBranchRequest>,
) -> AppResult<Json<BranchResponse>> {
    let branch = state
        .services
        .branches
        .update(auth_user.tenant_id, id, req.into())
        .await?;
    Ok(Json(branch.into()))
}

/// DELETE /api/branches/{id}
///
/// Soft delete; a second call answers 404.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = BRANCH_TAG,
    params(
        ("id" = Uuid, Path, description = "Branch ID")
    ),
    responses(
        (status = 200, description = "Branch deleted", body = MessageResponse),
        (status = 404, description = "Not found or already deleted", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_branch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.branches.delete(auth_user.tenant_id, id).await?;
    Ok(Json(MessageResponse::new("Branch deleted")))
}
