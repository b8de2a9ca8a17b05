//! Messaging gateway abstraction.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// A single outbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    pub phone: String,
    pub text: String,
}

/// Delivers text messages through a third-party provider.
///
/// Implementations report every provider-side failure as
/// [`AppError::Upstream`] and never retry.
///
/// ```ignore
/// #[async_trait]
/// impl SmsGateway for LoopbackGateway {
///     async fn send(&self, message: &SmsMessage) -> AppResult<()> {
///         self.sent.lock().await.push(message.clone());
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "loopback"
///     }
/// }
/// ```
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> AppResult<()>;

    /// Provider name for logs and error reports
    fn name(&self) -> &'static str;
}

/// Stand-in used while `sms.enabled` is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

#[async_trait]
impl SmsGateway for DisabledGateway {
    async fn send(&self, _message: &SmsMessage) -> AppResult<()> {
        Err(AppError::Upstream {
            service: self.name().to_string(),
            source: anyhow::anyhow!("SMS sending is disabled by configuration"),
        })
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_gateway_refuses() {
        let message = SmsMessage {
            phone: "+998900000000".into(),
            text: "hi".into(),
        };
        assert!(matches!(
            DisabledGateway.send(&message).await,
            Err(AppError::Upstream { .. })
        ));
    }
}
