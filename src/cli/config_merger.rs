//! Merges CLI overrides into file and environment configuration.
//!
//! Precedence, lowest first: config files, `CRM_*` variables, CLI flags.
//! Validation runs once, after all overrides.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the unvalidated base configuration selected by `--config`
    /// and `--env`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Applies CLI overrides and validates what the command needs.
    ///
    /// `migrate` only needs the database and logger sections, so it runs
    /// without JWT secrets configured.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        match &cli.command {
            Some(Commands::Migrate { .. }) => {
                config.database.validate()?;
                config.logger.validate()?;
            }
            _ => config.validate()?,
        }

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
