//! Balance DTOs. Amounts travel as decimal strings.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::format_timestamp;
use crate::models::{Balance, BalanceFilter};

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub company_id: Uuid,
    #[schema(value_type = String, example = "250.00")]
    pub amount: BigDecimal,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            company_id: balance.company_id,
            amount: balance.amount,
            created_at: format_timestamp(&balance.created_at),
            updated_at: format_timestamp(&balance.updated_at),
        }
    }
}

/// Body of both `POST /balance` and `PATCH /balance`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BalanceRequest {
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "250.00")]
    pub amount: BigDecimal,
}

fn non_negative(amount: &BigDecimal) -> Result<(), ValidationError> {
    if *amount < BigDecimal::from(0) {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Amount cannot be negative".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct BalanceListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<BalanceListQuery> for BalanceFilter {
    fn from(query: BalanceListQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
        }
    }
}
