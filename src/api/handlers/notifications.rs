//! Outbound SMS, gated on the tenant's balance.

use axum::{Extension, Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::{ErrorResponse, SmsRequest, SmsResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(send_sms))
}

/// POST /api/notifications/sms
///
/// A balance at or below the configured threshold is not an error: the
/// response is 200 with `sent: false`.
#[utoipa::path(
    post,
    path = "/sms",
    tag = NOTIFICATION_TAG,
    request_body = SmsRequest,
    responses(
        (status = 200, description = "Sent, or declined for low balance", body = SmsResponse),
        (status = 404, description = "No balance for this tenant", body = ErrorResponse),
        (status = 502, description = "Gateway rejected the message", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn send_sms(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<SmsRequest>,
) -> AppResult<Json<SmsResponse>> {
    let outcome = state
        .services
        .notifications
        .send_sms(auth_user.tenant_id, req.phone, req.message)
        .await?;
    Ok(Json(outcome.into()))
}
