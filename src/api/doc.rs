use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const ACCOUNT_TAG: &str = "Accounts";
pub const CLIENT_TAG: &str = "Clients";
pub const BRANCH_TAG: &str = "Branches";
pub const COMPANY_TAG: &str = "Companies";
pub const BALANCE_TAG: &str = "Balance";
pub const NOTIFICATION_TAG: &str = "Notifications";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "crm-auth",
        description = "Multi-tenant CRM backend: sessions, accounts, clients, branches, balances and SMS",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Login, token refresh and tenant registration"),
        (name = ACCOUNT_TAG, description = "Accounts of the caller's company"),
        (name = CLIENT_TAG, description = "Client records of the caller's company"),
        (name = BRANCH_TAG, description = "Branches of the caller's company"),
        (name = COMPANY_TAG, description = "Companies (tenants)"),
        (name = BALANCE_TAG, description = "Messaging balance"),
        (name = NOTIFICATION_TAG, description = "Balance-gated SMS"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/auth/login"))
                        .build(),
                ),
            )
        }
    }
}
