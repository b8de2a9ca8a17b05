//! Health check DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2025-01-15T09:00:00Z",
    "checks": {
        "database": {
            "status": "healthy",
            "message": "Connected",
            "response_time_ms": 3
        }
    }
}))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// RFC 3339 timestamp of the check
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    pub checks: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Overall status is the worst component status.
    pub fn from_checks(version: &str, checks: BTreeMap<String, ComponentHealth>) -> Self {
        let status = checks
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            version: version.to_string(),
            timestamp: jiff::Timestamp::now().to_string(),
            checks,
        }
    }
}

/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[schema(example = "Connected")]
    pub message: Option<String>,
    #[schema(example = 3)]
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    pub fn healthy(message: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: Some(message.into()),
            response_time_ms: Some(response_time_ms),
        }
    }

    pub fn unhealthy(message: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            response_time_ms: Some(response_time_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Unhealthy).unwrap();
        assert_eq!(json, "\"unhealthy\"");
    }

    #[test]
    fn test_worst_component_wins() {
        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), ComponentHealth::healthy("Connected", 2));
        assert_eq!(
            HealthResponse::from_checks("0.1.0", checks).status,
            HealthStatus::Healthy
        );

        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), ComponentHealth::unhealthy("timeout", 5000));
        checks.insert("sms".to_string(), ComponentHealth::healthy("Configured", 0));
        let response = HealthResponse::from_checks("0.1.0", checks);
        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.checks.len(), 2);
    }

    #[test]
    fn test_no_checks_is_healthy() {
        let response = HealthResponse::from_checks("0.1.0", BTreeMap::new());
        assert_eq!(response.status, HealthStatus::Healthy);
        assert!(response.timestamp.ends_with('Z'));
    }
}
