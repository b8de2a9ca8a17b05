//! Client records of the caller's tenant.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::CLIENT_TAG;
use crate::api::dto::{
    ClientListQuery, ClientResponse, CreateClientRequest, ErrorResponse, ListResponse,
    MessageResponse, UpdateClientRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn client_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_clients, create_client))
        .routes(routes!(get_client, update_client, delete_client))
}

/// GET /api/clients
///
/// `full_name`, `address` and `phone` match substrings; `type` and
/// `client_type` match exactly.
#[utoipa::path(
    get,
    path = "/",
    tag = CLIENT_TAG,
    params(ClientListQuery),
    responses(
        (status = 200, description = "Clients by page", body = ListResponse<ClientResponse>)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_clients(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<ClientListQuery>,
) -> AppResult<Json<ListResponse<ClientResponse>>> {
    let page = state
        .services
        .clients
        .list(auth_user.tenant_id, query.into())
        .await?;
    Ok(Json(ListResponse::from_page(page)))
}

/// POST /api/clients
#[utoipa::path(
    post,
    path = "/",
    tag = CLIENT_TAG,
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 422, description = "Invalid request data", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_client(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> AppResult<(StatusCode, Json<ClientResponse>)> {
    let client = state
        .services
        .clients
        .create(req.into_new(auth_user.tenant_id))
        .await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

/// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CLIENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "No such client in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_client(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientResponse>> {
    let client = state.services.clients.get(auth_user.tenant_id, id).await?;
    Ok(Json(client.into()))
}

/// PATCH /api/clients/{id}
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = CLIENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 404, description = "No such client in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_client(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateClientRequest>,
) -> AppResult<Json<ClientResponse>> {
    let client = state
        .services
        .clients
        .update(auth_user.tenant_id, id, req.into())
        .await?;
    Ok(Json(client.into()))
}

/// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CLIENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client deleted", body = MessageResponse),
        (status = 404, description = "No such client in this tenant", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_client(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.clients.delete(auth_user.tenant_id, id).await?;
    Ok(Json(MessageResponse::new("Client deleted")))
}
