//! Company (tenant) DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::format_timestamp;
use crate::models::{Company, CompanyFilter, NewCompany, UpdateCompany};

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    #[schema(example = "Acme")]
    pub name: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            website: company.website,
            logo: company.logo,
            created_at: format_timestamp(&company.created_at),
            updated_at: format_timestamp(&company.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(url(message = "Website must be a URL"))]
    pub website: Option<String>,
    #[validate(length(max = 512))]
    pub logo: Option<String>,
}

impl From<CreateCompanyRequest> for NewCompany {
    fn from(request: CreateCompanyRequest) -> Self {
        Self {
            name: request.name,
            website: request.website,
            logo: request.logo,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(url(message = "Website must be a URL"))]
    pub website: Option<String>,
    #[validate(length(max = 512))]
    pub logo: Option<String>,
}

impl From<UpdateCompanyRequest> for UpdateCompany {
    fn from(request: UpdateCompanyRequest) -> Self {
        Self {
            name: request.name,
            website: request.website,
            logo: request.logo,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct CompanyListQuery {
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<CompanyListQuery> for CompanyFilter {
    fn from(query: CompanyListQuery) -> Self {
        Self {
            name: query.name,
            page: query.page,
            limit: query.limit,
        }
    }
}
