//! Client DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::format_timestamp;
use crate::models::{Client, ClientFilter, NewClient, UpdateClient};

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Ali Valiev")]
    pub full_name: String,
    pub address: String,
    #[schema(example = "+998901234567")]
    pub phone: String,
    #[serde(rename = "type")]
    #[schema(example = "individual")]
    pub kind: String,
    #[schema(example = "regular")]
    pub client_type: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            company_id: client.company_id,
            full_name: client.full_name,
            address: client.address,
            phone: client.phone,
            kind: client.kind,
            client_type: client.client_type,
            created_at: format_timestamp(&client.created_at),
            updated_at: format_timestamp(&client.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(max = 512))]
    #[serde(default)]
    pub address: String,
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type is required"))]
    pub kind: String,
    #[validate(length(min = 1, max = 50, message = "Client type is required"))]
    pub client_type: String,
}

impl CreateClientRequest {
    pub fn into_new(self, company_id: Uuid) -> NewClient {
        NewClient {
            company_id,
            full_name: self.full_name,
            address: self.address,
            phone: self.phone,
            kind: self.kind,
            client_type: self.client_type,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(max = 50))]
    pub kind: Option<String>,
    #[validate(length(max = 50))]
    pub client_type: Option<String>,
}

impl From<UpdateClientRequest> for UpdateClient {
    fn from(request: UpdateClientRequest) -> Self {
        Self {
            full_name: request.full_name,
            address: request.address,
            phone: request.phone,
            kind: request.kind,
            client_type: request.client_type,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ClientListQuery {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub client_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<ClientListQuery> for ClientFilter {
    fn from(query: ClientListQuery) -> Self {
        Self {
            full_name: query.full_name,
            address: query.address,
            phone: query.phone,
            kind: query.kind,
            client_type: query.client_type,
            page: query.page,
            limit: query.limit,
        }
    }
}
