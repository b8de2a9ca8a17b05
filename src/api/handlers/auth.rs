//! Login, token refresh and tenant registration.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    ErrorResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, RegisterResponse,
    TokenResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Public routes, mounted at `/api/auth`.
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(refresh_token))
        .routes(routes!(register))
}

/// POST /api/auth/login
///
/// Unknown phone numbers and wrong passwords get the same 401.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid phone number or password", body = ErrorResponse),
        (status = 422, description = "Missing fields", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state
        .services
        .auth
        .login(&payload.phone_number, payload.password)
        .await?;
    Ok(Json(tokens.into()))
}

/// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state.services.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// POST /api/auth/register
///
/// Creates a company and its admin account atomically, then logs the admin in.
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Tenant created", body = RegisterResponse),
        (status = 409, description = "Phone number already registered", body = ErrorResponse),
        (status = 422, description = "Invalid request data", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let registered = state
        .services
        .auth
        .register(payload.into_bootstrap())
        .await?;

    let response = RegisterResponse {
        company: registered.company.into(),
        account: registered.account.into(),
        tokens: registered.tokens.into(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}
