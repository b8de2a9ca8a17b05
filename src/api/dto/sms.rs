//! SMS notification DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::sms::SmsOutcome;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SmsRequest {
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    #[schema(example = "+998901234567")]
    pub phone: String,
    #[validate(length(min = 1, max = 918, message = "Message is required"))]
    #[schema(example = "Your order is ready")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SmsResponse {
    /// Whether the gateway accepted the message
    pub sent: bool,
    #[schema(example = "Message sent")]
    pub message: String,
}

impl From<SmsOutcome> for SmsResponse {
    fn from(outcome: SmsOutcome) -> Self {
        Self {
            sent: outcome.sent,
            message: outcome.message.to_string(),
        }
    }
}
