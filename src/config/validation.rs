//! Configuration validation logic
//!
//! Validation methods for all configuration structures, checking that values
//! are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    AuthConfig, DatabaseConfig, FileSettings, JwtConfig, LoggerSettings, ServerConfig, Settings,
    SmsConfig,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

const MIN_SECRET_LEN: usize = 32;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - Keep-alive timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a non-empty PostgreSQL URL
    /// - Min and max connections must be positive, with min <= max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.is_valid_database_url() {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}

impl JwtConfig {
    /// Validate token configuration
    ///
    /// # Validation Rules
    /// - Both secrets must be at least 32 characters
    /// - The two secrets must differ
    /// - Lifetimes must be positive, refresh longer than access
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_secret("jwt.access_secret", &self.access_secret)?;
        Self::validate_secret("jwt.refresh_secret", &self.refresh_secret)?;

        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::validation(
                "jwt.refresh_secret",
                "Refresh secret must differ from the access secret.",
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }

        if self.refresh_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.refresh_token_expiration",
                "Refresh token expiration must be positive",
            ));
        }

        if self.access_token_expiration >= self.refresh_token_expiration {
            return Err(ConfigError::validation(
                "jwt",
                "Refresh token expiration should be longer than access token expiration",
            ));
        }

        Ok(())
    }

    fn validate_secret(field: &str, secret: &str) -> Result<(), ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "Secret cannot be empty".to_string(),
            });
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: format!("Secret should be at least {MIN_SECRET_LEN} characters"),
            });
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platform_role.trim().is_empty() {
            return Err(ConfigError::validation(
                "auth.platform_role",
                "Platform role cannot be empty.",
            ));
        }
        if self.platform_role == crate::services::ADMIN_ROLE {
            return Err(ConfigError::validation(
                "auth.platform_role",
                "Platform role must differ from the role given to self-registered tenant admins.",
            ));
        }
        Ok(())
    }
}

impl SmsConfig {
    /// Validate gateway configuration.
    ///
    /// Credentials are only required while sending is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.balance_threshold < 0 {
            return Err(ConfigError::validation(
                "sms.balance_threshold",
                "Balance threshold cannot be negative.",
            ));
        }

        if !self.enabled {
            return Ok(());
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "sms.base_url",
                "Gateway base URL must start with http:// or https://",
            ));
        }

        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ConfigError::validation(
                "sms.email",
                "Gateway email and password are required when SMS is enabled.",
            ));
        }

        if self.from.trim().is_empty() {
            return Err(ConfigError::validation(
                "sms.from",
                "Sender id is required when SMS is enabled.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "sms.timeout",
                "Gateway timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all sections, returning the first error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.auth.validate()?;
        self.sms.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
