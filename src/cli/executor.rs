//! Dispatches a parsed command to its handler.

use super::handlers::bootstrap::bootstrap_input;
use super::handlers::{BootstrapCommandHandler, MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::services::ADMIN_ROLE;
use crate::error::AppResult;

/// Runs the command in `cli` with merged settings. No subcommand means
/// `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
        Some(Commands::Bootstrap {
            company,
            first_name,
            last_name,
            phone,
            password,
            email,
            platform,
        }) => {
            let role = if *platform {
                settings.auth.platform_role.as_str()
            } else {
                ADMIN_ROLE
            };
            let input = bootstrap_input(
                company,
                first_name,
                last_name,
                phone,
                password,
                email.as_deref(),
                role,
            );
            BootstrapCommandHandler::new(settings)
                .execute(input)
                .await
                .map(|_| ())
        }
    }
}
