//! Eskiz-style HTTP gateway.
//!
//! Each send logs in with the configured account to obtain a bearer token,
//! then posts the message. The provider answers `status = "waiting"` when
//! the message has been queued.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::gateway::{SmsGateway, SmsMessage};
use crate::config::SmsConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;

const LOGIN_PATH: &str = "/api/auth/login";
const SEND_PATH: &str = "/api/message/sms/send";
const QUEUED_STATUS: &str = "waiting";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(default)]
    token: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    mobile_phone: &'a str,
    message: &'a str,
    from: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct EskizGateway {
    base_url: String,
    email: String,
    password: String,
    from: String,
    timeout: Duration,
}

impl std::fmt::Debug for EskizGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EskizGateway")
            .field("base_url", &self.base_url)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl EskizGateway {
    pub fn new(config: &SmsConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            password: config.password.clone(),
            from: config.from.clone(),
            timeout: Duration::from_secs(config.timeout),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn upstream(&self, source: anyhow::Error) -> AppError {
        AppError::Upstream {
            service: self.name().to_string(),
            source,
        }
    }

    async fn login(&self) -> AppResult<String> {
        let body = HTTP_CLIENT
            .post(self.url(LOGIN_PATH))
            .timeout(self.timeout)
            .json(&LoginRequest {
                email: &self.email,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| self.upstream(anyhow::Error::from(e).context("gateway login failed")))?
            .text()
            .await
            .map_err(|e| self.upstream(e.into()))?;

        parse_token(&body).map_err(|e| self.upstream(e))
    }
}

/// Extracts `data.token` from a login response body.
fn parse_token(body: &str) -> anyhow::Result<String> {
    let response: LoginResponse = serde_json::from_str(body)?;
    match response.data {
        Some(LoginData { token }) if !token.is_empty() => Ok(token),
        _ => anyhow::bail!("gateway login returned no token"),
    }
}

/// Accepts a send response only when the message was queued.
fn check_send_status(body: &str) -> anyhow::Result<()> {
    let response: SendResponse = serde_json::from_str(body)?;
    if response.status != QUEUED_STATUS {
        anyhow::bail!(
            "gateway rejected message: status={:?} message={:?}",
            response.status,
            response.message
        );
    }
    Ok(())
}

#[async_trait]
impl SmsGateway for EskizGateway {
    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        let token = self.login().await?;

        let body = HTTP_CLIENT
            .post(self.url(SEND_PATH))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(&SendRequest {
                mobile_phone: &message.phone,
                message: &message.text,
                from: &self.from,
            })
            .send()
            .await
            .map_err(|e| self.upstream(anyhow::Error::from(e).context("gateway send failed")))?
            .text()
            .await
            .map_err(|e| self.upstream(e.into()))?;

        check_send_status(&body).map_err(|e| self.upstream(e))?;
        debug!(phone = %message.phone, "SMS queued by gateway");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "eskiz"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> EskizGateway {
        EskizGateway::new(&SmsConfig {
            enabled: true,
            base_url: server.uri(),
            email: "ops@example.com".to_string(),
            password: "hunter2".to_string(),
            from: "4546".to_string(),
            ..SmsConfig::default()
        })
    }

    fn message() -> SmsMessage {
        SmsMessage {
            phone: "998901234567".to_string(),
            text: "Your code is 1234".to_string(),
        }
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": "token_generated", "data": { "token": "tok" } })),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_send_logs_in_then_posts_message() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({
                "mobile_phone": "998901234567",
                "message": "Your code is 1234",
                "from": "4546",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "42", "message": "Waiting for SMS provider", "status": "waiting" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        gateway_for(&server).send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_message_is_upstream_error() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "", "message": "Insufficient funds", "status": "error" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway_for(&server).send(&message()).await;
        assert!(matches!(result, Err(AppError::Upstream { service, .. }) if service == "eskiz"));
    }

    #[tokio::test]
    async fn test_failed_login_never_sends() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = gateway_for(&server).send(&message()).await;
        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }

    #[test]
    fn test_parse_token() {
        let body = r#"{"message":"token_generated","data":{"token":"eyJ.abc"},"token_type":"bearer"}"#;
        assert_eq!(parse_token(body).unwrap(), "eyJ.abc");
    }

    #[test]
    fn test_parse_token_missing() {
        assert!(parse_token(r#"{"message":"Invalid credentials"}"#).is_err());
        assert!(parse_token(r#"{"data":{"token":""}}"#).is_err());
        assert!(parse_token("<html>").is_err());
    }

    #[test]
    fn test_send_status() {
        assert!(check_send_status(r#"{"id":"42","message":"Waiting for SMS provider","status":"waiting"}"#).is_ok());

        let err = check_send_status(r#"{"id":"","message":"Insufficient funds","status":"error"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Insufficient funds"));
    }

    #[test]
    fn test_urls_join_without_double_slash() {
        let gateway = EskizGateway::new(&SmsConfig {
            base_url: "https://notify.example.test/".to_string(),
            ..SmsConfig::default()
        });
        assert_eq!(
            gateway.url(SEND_PATH),
            "https://notify.example.test/api/message/sms/send"
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let gateway = EskizGateway::new(&SmsConfig {
            email: "ops@example.com".to_string(),
            password: "hunter2".to_string(),
            ..SmsConfig::default()
        });
        let debug = format!("{gateway:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("ops@example.com"));
    }
}
