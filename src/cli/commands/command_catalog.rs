// CLI commands module.
// Each command gets its own file; this one wires them to the argument parser.

pub mod balance;
pub mod migrate;

use crate::core::economy::{BalanceStore, CurrencyRegistry};
use crate::core::migration::MigrationService;
use clap::{ArgAction, Parser, Subcommand};
use std::sync::Arc;
use uuid::Uuid;

/// Services shared by every command.
pub struct Data {
    pub balances: Arc<dyn BalanceStore>,
    pub currencies: Arc<dyn CurrencyRegistry>,
    pub migration: MigrationService,
}

#[derive(Debug, Parser)]
#[command(name = "economy", about = "Player balance administration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Migrate balances into the active backend (totaleconomy or tomysql)
    Migrate {
        mode: Option<String>,
        /// Must be true for the migration to run
        #[arg(action = ArgAction::Set)]
        confirm: Option<bool>,
    },
    /// Show a player's balance
    Balance {
        player: Uuid,
        /// Currency id (defaults to the default currency)
        #[arg(long)]
        currency: Option<String>,
    },
}

/// Run a parsed command and return the text to show the operator.
pub async fn dispatch(command: Command, data: &Data) -> anyhow::Result<String> {
    match command {
        Command::Migrate { mode, confirm } => Ok(migrate::migrate(data, mode, confirm).await),
        Command::Balance { player, currency } => balance::balance(data, player, currency).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_migrate_arguments() {
        let cli = Cli::try_parse_from(["economy", "migrate", "tomysql", "true"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Migrate { mode: Some(ref m), confirm: Some(true) } if m == "tomysql"
        ));

        let cli = Cli::try_parse_from(["economy", "migrate", "totaleconomy"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate { confirm: None, .. }));

        let cli = Cli::try_parse_from(["economy", "migrate"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate { mode: None, .. }));
    }

    #[test]
    fn test_rejects_non_boolean_confirmation() {
        assert!(Cli::try_parse_from(["economy", "migrate", "tomysql", "maybe"]).is_err());
    }

    #[test]
    fn test_parses_balance_arguments() {
        let cli = Cli::try_parse_from([
            "economy",
            "balance",
            "11111111-1111-1111-1111-111111111111",
            "--currency",
            "gems",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Balance { currency: Some(ref c), .. } if c == "gems"
        ));
    }
}
