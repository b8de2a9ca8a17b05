//! Account DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::format_timestamp;
use crate::models::{Account, AccountFilter};
use crate::services::{AccountChanges, AccountDraft};

/// Account as returned by the API. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Jo")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    pub email: Option<String>,
    #[schema(example = "+1000")]
    pub phone_number: String,
    #[schema(example = "admin")]
    pub role: String,
    #[schema(example = "2025-01-15T09:00:00")]
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            company_id: account.company_id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone_number: account.phone_number,
            role: account.role,
            created_at: format_timestamp(&account.created_at),
            updated_at: format_timestamp(&account.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(format = "password")]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "Role is required"))]
    #[schema(example = "manager")]
    pub role: String,
}

impl From<CreateAccountRequest> for AccountDraft {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            password: request.password,
            role: request.role,
        }
    }
}

/// Partial update. Omitted or blank fields stay as they are.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[schema(format = "password")]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub role: Option<String>,
}

impl From<UpdateAccountRequest> for AccountChanges {
    fn from(request: UpdateAccountRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            password: request.password,
            role: request.role,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AccountListQuery {
    /// Substring of the first name
    pub first_name: Option<String>,
    /// Substring of the last name
    pub last_name: Option<String>,
    /// Exact role
    pub role: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<AccountListQuery> for AccountFilter {
    fn from(query: AccountListQuery) -> Self {
        Self {
            first_name: query.first_name,
            last_name: query.last_name,
            role: query.role,
            page: query.page,
            limit: query.limit,
        }
    }
}

/// Query for `GET /companies/{id}/accounts`.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct CompanyAccountsQuery {
    /// Substring of "first_name last_name"
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
