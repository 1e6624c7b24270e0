// Entry point of the economy admin tool.
//
// **Architecture Overview:**
// - `core/` = Business logic (storage traits, migrations)
// - `infra/` = Implementations of core traits (JSON file, SQL)
// - `cli/` = Command line adapter (argument parsing, output text)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Run the requested command

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::cli::{dispatch, Cli, Data};
use crate::config::AppConfig;
use crate::core::economy::{
    AccountExport, BackendKind, BalanceStore, ConfiguredCurrencies, CurrencyRegistry,
};
use crate::core::migration::MigrationService;
use crate::infra::economy::{JsonBalanceStore, SqlBalanceStore};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    let args = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let currencies: Arc<dyn CurrencyRegistry> = Arc::new(
        ConfiguredCurrencies::new(config.currencies.clone(), &config.default_currency)
            .context("Invalid currency configuration")?,
    );

    // The embedded store is always opened: it is the default backend and the
    // source of `tomysql` migrations.
    let embedded = Arc::new(
        JsonBalanceStore::new(config.embedded_store_path())
            .context("Failed to open embedded balance store")?,
    );

    let balances: Arc<dyn BalanceStore> = match config.backend {
        BackendKind::Embedded => embedded.clone(),
        BackendKind::Sql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the sql backend")?;
            Arc::new(
                SqlBalanceStore::connect(url, config.max_connections)
                    .await
                    .context("Failed to connect to SQL balance store")?,
            )
        }
    };
    tracing::info!(backend = %balances.backend(), "Balance backend ready");

    let embedded_source: Arc<dyn AccountExport> = embedded;
    let migration = MigrationService::new(
        Arc::clone(&balances),
        Arc::clone(&currencies),
        embedded_source,
        config.legacy_dir.clone(),
    );

    let data = Data {
        balances,
        currencies,
        migration,
    };

    let message = dispatch(args.command, &data).await?;
    println!("{message}");

    Ok(())
}
