//! Branch DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::format_timestamp;
use crate::models::{Branch, BranchFilter, NewBranch, UpdateBranch};

#[derive(Debug, Serialize, ToSchema)]
pub struct BranchResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Downtown")]
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Branch> for BranchResponse {
    fn from(branch: Branch) -> Self {
        Self {
            id: branch.id,
            company_id: branch.company_id,
            name: branch.name,
            address: branch.address,
            phone_number: branch.phone_number,
            created_at: format_timestamp(&branch.created_at),
            updated_at: format_timestamp(&branch.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 512))]
    #[serde(default)]
    pub address: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone_number: String,
}

impl CreateBranchRequest {
    pub fn into_new(self, company_id: Uuid) -> NewBranch {
        NewBranch {
            company_id,
            name: self.name,
            address: self.address,
            phone_number: self.phone_number,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateBranchRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
}

impl From<UpdateBranchRequest> for UpdateBranch {
    fn from(request: UpdateBranchRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            phone_number: request.phone_number,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct BranchListQuery {
    /// Substring of the branch name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<BranchListQuery> for BranchFilter {
    fn from(query: BranchListQuery) -> Self {
        Self {
            name: query.name,
            page: query.page,
            limit: query.limit,
        }
    }
}
