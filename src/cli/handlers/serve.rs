//! Serve command handler.

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server, or with `dry_run` only checks the configuration.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config)
            .run()
            .await
            .map_err(|source| crate::error::AppError::Internal { source })
    }

    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Access/refresh token lifetimes: {}h / {}h",
            self.config.jwt.access_token_expiration, self.config.jwt.refresh_token_expiration
        );
        println!(
            "✓ SMS sending {} (balance threshold {})",
            if self.config.sms.enabled { "enabled" } else { "disabled" },
            self.config.sms.balance_threshold
        );
        if self.config.database.auto_migrate {
            println!("✓ Pending migrations will be applied on startup");
        }
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        config.jwt.access_secret = "access-secret-for-serve-tests-0123456789".to_string();
        config.jwt.refresh_secret = "refresh-secret-for-serve-tests-0123456789".to_string();
        config
    }

    #[test]
    fn test_serve_handler_new() {
        let config = create_valid_config();
        let handler = ServeCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let handler = ServeCommandHandler::new(create_valid_config());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = create_valid_config();
        config.jwt.refresh_secret = config.jwt.access_secret.clone();
        let handler = ServeCommandHandler::new(config);

        assert!(matches!(
            handler.execute(true).await,
            Err(AppError::Configuration { .. })
        ));
    }
}
