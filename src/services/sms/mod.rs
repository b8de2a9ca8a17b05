//! Balance-gated SMS notifications.

mod eskiz;
mod gateway;

pub use eskiz::EskizGateway;
pub use gateway::{DisabledGateway, SmsGateway, SmsMessage};

use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SmsConfig;
use crate::error::AppResult;
use crate::repositories::BalanceRepository;

pub const SENT_MESSAGE: &str = "Message sent";
pub const DECLINED_MESSAGE: &str = "Not enough balance";

/// Result of a notification request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsOutcome {
    pub sent: bool,
    pub message: &'static str,
}

impl SmsOutcome {
    fn sent() -> Self {
        Self {
            sent: true,
            message: SENT_MESSAGE,
        }
    }

    fn declined() -> Self {
        Self {
            sent: false,
            message: DECLINED_MESSAGE,
        }
    }
}

/// Where the current balance of a tenant comes from.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// `NotFound` when the tenant has no live balance.
    async fn amount(&self, tenant_id: Uuid) -> AppResult<BigDecimal>;
}

#[async_trait]
impl BalanceSource for BalanceRepository {
    async fn amount(&self, tenant_id: Uuid) -> AppResult<BigDecimal> {
        Ok(self.find(tenant_id).await?.amount)
    }
}

/// Sending is allowed only while the balance is strictly above the threshold.
pub fn balance_allows_sending(amount: &BigDecimal, threshold: &BigDecimal) -> bool {
    amount > threshold
}

#[derive(Clone)]
pub struct NotificationService {
    balances: Arc<dyn BalanceSource>,
    gateway: Arc<dyn SmsGateway>,
    threshold: BigDecimal,
}

impl NotificationService {
    pub fn new(
        balances: Arc<dyn BalanceSource>,
        gateway: Arc<dyn SmsGateway>,
        threshold: i64,
    ) -> Self {
        Self {
            balances,
            gateway,
            threshold: BigDecimal::from(threshold),
        }
    }

    /// Picks the gateway from configuration.
    pub fn from_config(balances: BalanceRepository, config: &SmsConfig) -> Self {
        let gateway: Arc<dyn SmsGateway> = if config.enabled {
            Arc::new(EskizGateway::new(config))
        } else {
            Arc::new(DisabledGateway)
        };
        Self::new(Arc::new(balances), gateway, config.balance_threshold)
    }

    /// Sends `text` to `phone` on behalf of the tenant if its balance allows.
    ///
    /// A missing balance is `NotFound`; a low balance is a declined outcome
    /// with no gateway traffic.
    pub async fn send_sms(&self, tenant_id: Uuid, phone: String, text: String) -> AppResult<SmsOutcome> {
        let amount = self.balances.amount(tenant_id).await?;

        if !balance_allows_sending(&amount, &self.threshold) {
            info!(%tenant_id, %amount, "SMS declined: balance at or below threshold");
            return Ok(SmsOutcome::declined());
        }

        let message = SmsMessage { phone, text };
        if let Err(e) = self.gateway.send(&message).await {
            warn!(%tenant_id, gateway = self.gateway.name(), error = ?e, "SMS delivery failed");
            return Err(e);
        }

        info!(%tenant_id, gateway = self.gateway.name(), "SMS sent");
        Ok(SmsOutcome::sent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    struct FixedBalance(Option<BigDecimal>);

    #[async_trait]
    impl BalanceSource for FixedBalance {
        async fn amount(&self, tenant_id: Uuid) -> AppResult<BigDecimal> {
            self.0
                .clone()
                .ok_or_else(|| AppError::not_found("balance", "company_id", tenant_id))
        }
    }

    /// Remembers every message it is handed; optionally fails each send.
    #[derive(Default)]
    struct RecordingGateway {
        sent: Mutex<Vec<SmsMessage>>,
        fail: bool,
    }

    impl RecordingGateway {
        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SmsGateway for RecordingGateway {
        async fn send(&self, message: &SmsMessage) -> AppResult<()> {
            self.sent.lock().unwrap().push(message.clone());
            if self.fail {
                return Err(AppError::Upstream {
                    service: "recording".to_string(),
                    source: anyhow::anyhow!("provider unavailable"),
                });
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn service(amount: Option<&str>, gateway: Arc<RecordingGateway>) -> NotificationService {
        NotificationService::new(Arc::new(FixedBalance(amount.map(dec))), gateway, 200)
    }

    #[tokio::test]
    async fn test_send_above_threshold() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = service(Some("5000"), gateway.clone())
            .send_sms(Uuid::from_u128(1), "+4000".to_string(), "hello".to_string())
            .await
            .unwrap();

        assert_eq!(outcome, SmsOutcome::sent());
        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone, "+4000");
        assert_eq!(sent[0].text, "hello");
    }

    #[tokio::test]
    async fn test_low_balance_skips_gateway() {
        for amount in ["150", "200"] {
            let gateway = Arc::new(RecordingGateway::default());
            let outcome = service(Some(amount), gateway.clone())
                .send_sms(Uuid::from_u128(1), "+4000".to_string(), "hello".to_string())
                .await
                .unwrap();

            assert_eq!(outcome, SmsOutcome::declined());
            assert_eq!(gateway.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_gateway_failure_is_returned() {
        let gateway = Arc::new(RecordingGateway {
            fail: true,
            ..Default::default()
        });
        let result = service(Some("5000"), gateway.clone())
            .send_sms(Uuid::from_u128(1), "+4000".to_string(), "hello".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_balance_is_not_found() {
        let gateway = Arc::new(RecordingGateway::default());
        let result = service(None, gateway.clone())
            .send_sms(Uuid::from_u128(1), "+4000".to_string(), "hello".to_string())
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_gate_is_strictly_greater() {
        let threshold = BigDecimal::from(200);
        assert!(!balance_allows_sending(&dec("150"), &threshold));
        assert!(!balance_allows_sending(&dec("200"), &threshold));
        assert!(!balance_allows_sending(&dec("200.00"), &threshold));
        assert!(balance_allows_sending(&dec("200.01"), &threshold));
        assert!(balance_allows_sending(&dec("5000"), &threshold));
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let threshold = BigDecimal::from(SmsConfig::default().balance_threshold);
        assert!(!balance_allows_sending(&dec("150"), &threshold));

        let threshold = BigDecimal::from(100);
        assert!(balance_allows_sending(&dec("150"), &threshold));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(SmsOutcome::declined().message, "Not enough balance");
        assert!(!SmsOutcome::declined().sent);
        assert_eq!(SmsOutcome::sent().message, "Message sent");
    }
}
