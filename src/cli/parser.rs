//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Multi-tenant CRM backend with JWT sessions
#[derive(Parser, Debug)]
#[command(name = "crm-auth")]
#[command(about = "Multi-tenant CRM backend with JWT sessions")]
#[command(long_about = "
crm-auth serves the tenant-scoped CRM API: login and token refresh, accounts,
clients, branches, companies, balances and balance-gated SMS.

EXAMPLES:
    # Start the server with layered configuration from ./config
    crm-auth serve

    # Bind elsewhere
    crm-auth serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    crm-auth --config /etc/crm-auth/production.toml serve

    # Check configuration without starting the server
    crm-auth serve --dry-run

    # Apply, preview or roll back migrations
    crm-auth migrate
    crm-auth migrate --dry-run
    crm-auth migrate --rollback 1

    # Create the first company and its admin account
    crm-auth bootstrap --company Acme --first-name Jo --last-name Doe --phone +1000 --password pw

    # Create the operator account that may act across tenants
    crm-auth bootstrap --company Ops --first-name Ann --last-name Lee --phone +1999 --platform
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Replaces the layered config/ directory with a single TOML file.
    /// CRM_* environment variables still apply on top.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (CRM_APP_ENV)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level for this run; beats --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the last N migrations (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Create a company and its admin account in one transaction
    Bootstrap {
        /// Company name
        #[arg(long, value_name = "NAME", value_parser = super::validation::validate_non_empty)]
        company: String,

        #[arg(long, value_parser = super::validation::validate_non_empty)]
        first_name: String,

        #[arg(long, value_parser = super::validation::validate_non_empty)]
        last_name: String,

        /// Login phone number, unique across all tenants
        #[arg(long, value_parser = super::validation::validate_non_empty)]
        phone: String,

        /// Admin password; prefer the environment variable over the flag
        #[arg(long, env = "CRM_BOOTSTRAP_PASSWORD", hide_env_values = true, value_parser = super::validation::validate_password)]
        password: String,

        #[arg(long)]
        email: Option<String>,

        /// Give the account the configured platform role instead of admin
        #[arg(long)]
        platform: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["crm-auth", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["crm-auth"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from(["crm-auth", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .unwrap();
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                dry_run,
                ..
            }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {other:?}"),
        }
    }

    #[test]
    fn test_migrate_flags_conflict() {
        let err = Cli::try_parse_from(["crm-auth", "migrate", "--dry-run", "--rollback", "1"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_bootstrap_command() {
        let cli = Cli::try_parse_from([
            "crm-auth",
            "bootstrap",
            "--company",
            "Acme",
            "--first-name",
            "Jo",
            "--last-name",
            "Doe",
            "--phone",
            "+1000",
            "--password",
            "pw",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Bootstrap {
                company,
                phone,
                email,
                platform,
                ..
            }) => {
                assert_eq!(company, "Acme");
                assert_eq!(phone, "+1000");
                assert!(email.is_none());
                assert!(!platform);
            }
            other => panic!("Expected Bootstrap command, got {other:?}"),
        }
    }

    #[test]
    fn test_bootstrap_platform_flag() {
        let cli = Cli::try_parse_from([
            "crm-auth",
            "bootstrap",
            "--company",
            "Platform Ops",
            "--first-name",
            "Jo",
            "--last-name",
            "Doe",
            "--phone",
            "+1999",
            "--password",
            "pw",
            "--platform",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Bootstrap { platform: true, .. })
        ));
    }

    #[test]
    fn test_bootstrap_rejects_blank_phone() {
        let result = Cli::try_parse_from([
            "crm-auth",
            "bootstrap",
            "--company",
            "Acme",
            "--first-name",
            "Jo",
            "--last-name",
            "Doe",
            "--phone",
            "  ",
            "--password",
            "pw",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["crm-auth", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_env_alias() {
        let cli = Cli::try_parse_from(["crm-auth", "--env", "prod"]).unwrap();
        let env: crate::config::Environment = cli.env.unwrap().into();
        assert_eq!(env, crate::config::Environment::Production);
    }
}
