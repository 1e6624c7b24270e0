// Entry point for balance migrations.
//
// A run is one invocation: the operator names a mode, then repeats the call
// with confirmation. Nothing is remembered between calls. Runs are not locked
// against each other, so callers must not start two at once.

use super::backend_migrator::BackendMigrator;
use super::config_tree;
use super::legacy_balances::{count_non_player_keys, extract_balances, LEGACY_ACCOUNTS_PATH};
use super::migration_models::{
    MigrationError, MigrationMode, MigrationOutcome, MigrationReport, MigrationRequest,
};
use crate::core::economy::{AccountExport, BackendKind, BalanceStore, Cause, CurrencyRegistry};
use std::path::PathBuf;
use std::sync::Arc;

pub struct MigrationService {
    /// The active player balance backend, destination of every migration.
    balances: Arc<dyn BalanceStore>,
    currencies: Arc<dyn CurrencyRegistry>,
    /// Read-only view of the embedded store, source of `tomysql`.
    embedded: Arc<dyn AccountExport>,
    /// Base directory holding `totaleconomy/accounts.conf`.
    legacy_dir: PathBuf,
}

impl MigrationService {
    pub fn new(
        balances: Arc<dyn BalanceStore>,
        currencies: Arc<dyn CurrencyRegistry>,
        embedded: Arc<dyn AccountExport>,
        legacy_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            balances,
            currencies,
            embedded,
            legacy_dir: legacy_dir.into(),
        }
    }

    /// Handle one migrate request and report its terminal outcome.
    pub async fn run(&self, request: MigrationRequest) -> MigrationOutcome {
        let Some(raw_mode) = request.mode else {
            return MigrationOutcome::MissingMode;
        };

        if !request.confirm.unwrap_or(false) {
            tracing::info!(mode = %raw_mode, "Migration requested, waiting for confirmation");
            return MigrationOutcome::ConfirmationRequired { mode: raw_mode };
        }

        let mode = match raw_mode.parse::<MigrationMode>() {
            Ok(mode) => mode,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected migration request");
                return MigrationOutcome::UnknownMode { mode: raw_mode };
            }
        };

        tracing::info!(%mode, "Starting migration");
        match self.execute(mode).await {
            Ok(report) => {
                tracing::info!(
                    %mode,
                    written = report.written,
                    skipped = report.skipped,
                    "Migration completed"
                );
                MigrationOutcome::Completed(report)
            }
            Err(error) => {
                tracing::error!(%mode, error = %error, "Migration failed");
                MigrationOutcome::Failed { mode, error }
            }
        }
    }

    async fn execute(&self, mode: MigrationMode) -> Result<MigrationReport, MigrationError> {
        match mode {
            MigrationMode::TotalEconomy => self.import_total_economy().await,
            MigrationMode::ToSql => self.migrate_to_sql().await,
        }
    }

    async fn import_total_economy(&self) -> Result<MigrationReport, MigrationError> {
        let path = self.legacy_dir.join(LEGACY_ACCOUNTS_PATH);
        let root = config_tree::load(&path)?;

        let currency = self.currencies.default_currency();
        let cause = Cause::migration();
        let mut report = MigrationReport::new(MigrationMode::TotalEconomy);
        report.skipped = count_non_player_keys(&root);

        for record in extract_balances(&root) {
            self.balances
                .set_balance(record.player_id, record.amount, &currency, &cause)
                .await?;
            tracing::debug!(
                player_id = %record.player_id,
                amount = %record.amount,
                "Migrated legacy balance"
            );
            report.written += 1;
        }

        Ok(report)
    }

    async fn migrate_to_sql(&self) -> Result<MigrationReport, MigrationError> {
        let destination = self.balances.as_ref();
        if destination.backend() == BackendKind::Embedded {
            return Err(MigrationError::Precondition(
                "the embedded store is the active backend; configure a SQL backend first"
                    .to_string(),
            ));
        }
        let Some(writer) = destination.raw_writer() else {
            return Err(MigrationError::Precondition(format!(
                "the active {} backend does not support raw writes",
                destination.backend()
            )));
        };

        BackendMigrator::new(self.embedded.as_ref(), writer, self.currencies.as_ref())
            .run()
            .await
    }
}
